//! Criterion benchmarks for the embedding and vector kernels.
//!
//! Performance targets:
//! - Hash embedding, 2048 dims: < 50us
//! - Dot product / cosine, 2048 dims: < 2us
//! - SIMD at least 2x scalar on 1024+ dims

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use fastembed_native::core::SUPPORTED_DIMENSIONS;
use fastembed_native::embed::{WordHashTokenizer, generate};
use fastembed_native::vector::{Backend, Kernel};

const SAMPLE_TEXT: &str = "The quick brown fox jumps over the lazy dog while the \
                           vector kernel hashes every byte of this sentence.";

// =============================================================================
// Hash Embedding Benchmarks
// =============================================================================

fn hash_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_embed");

    for dim in SUPPORTED_DIMENSIONS {
        let mut out = vec![0.0f32; dim];
        group.throughput(Throughput::Elements(dim as u64));
        group.bench_with_input(BenchmarkId::from_parameter(dim), &dim, |b, &dim| {
            b.iter(|| generate(black_box(SAMPLE_TEXT.as_bytes()), &mut out, dim));
        });
    }

    let long_text = "lorem ipsum ".repeat(680);
    let mut out = vec![0.0f32; 128];
    group.throughput(Throughput::Bytes(long_text.len() as u64));
    group.bench_function("max_length_text_128", |b| {
        b.iter(|| generate(black_box(long_text.as_bytes()), &mut out, 128));
    });

    group.finish();
}

// =============================================================================
// Vector Kernel Benchmarks
// =============================================================================

fn vector_benchmarks(c: &mut Criterion) {
    for backend in [Backend::Simd, Backend::Scalar] {
        let kernel = Kernel::new(backend);
        let mut group = c.benchmark_group(format!("vector_{backend}"));

        for dim in [128usize, 768, 2048] {
            let a: Vec<f32> = (0..dim).map(|i| (i as f32 * 0.013).sin()).collect();
            let b: Vec<f32> = (0..dim).map(|i| (i as f32 * 0.029).cos()).collect();
            let mut out = vec![0.0f32; dim];
            group.throughput(Throughput::Elements(dim as u64));

            group.bench_with_input(BenchmarkId::new("dot", dim), &dim, |bench, _| {
                bench.iter(|| kernel.dot_product(black_box(&a), black_box(&b)));
            });
            group.bench_with_input(BenchmarkId::new("cosine", dim), &dim, |bench, _| {
                bench.iter(|| kernel.cosine_similarity(black_box(&a), black_box(&b)));
            });
            group.bench_with_input(BenchmarkId::new("add", dim), &dim, |bench, _| {
                bench.iter(|| kernel.add_vectors(black_box(&a), black_box(&b), &mut out));
            });
            group.bench_with_input(BenchmarkId::new("normalize", dim), &dim, |bench, _| {
                let mut v = a.clone();
                bench.iter(|| kernel.normalize(black_box(&mut v)));
            });
        }

        group.finish();
    }
}

// =============================================================================
// Tokenizer Benchmarks
// =============================================================================

fn tokenizer_benchmarks(c: &mut Criterion) {
    let tokenizer = WordHashTokenizer::default();
    c.bench_function("tokenize_sentence", |b| {
        b.iter(|| tokenizer.encode(black_box(SAMPLE_TEXT.as_bytes())));
    });
}

criterion_group!(
    benches,
    hash_benchmarks,
    vector_benchmarks,
    tokenizer_benchmarks
);
criterion_main!(benches);
