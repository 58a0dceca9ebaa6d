//! Hash embeddings.
//!
//! Deterministic, model-free vectors built from two position-weighted
//! polynomial hashes per output index, mapped onto [-1, 1] with a sine.
//! Identical `(text, dimension)` gives a bit-identical vector on every
//! platform.

use std::f64::consts::TAU;

use crate::core::dimension::{self, Dimension};
use crate::embed::sine;
use crate::error::{EmbedError, Result};
use crate::vector;

/// Multiplier of the polynomial hash.
const HASH_BASE: u64 = 31;
/// Seed multiplier for the second hash of each index.
const SECOND_SEED_FACTOR: u64 = 37;
/// Shift applied to the second hash before combining.
const COMBINE_SHIFT: u32 = 16;
/// Modulus of the combined hash before it is mapped to an angle (2^31).
const ANGLE_SCALE: u64 = 1 << 31;

/// `h = seed; h = h*31 + byte_j*(j+1)` over the text, wrapping in u64.
#[must_use]
pub fn positional_hash(text: &[u8], seed: u64) -> u64 {
    text.iter().enumerate().fold(seed, |hash, (j, &byte)| {
        hash.wrapping_mul(HASH_BASE)
            .wrapping_add(u64::from(byte).wrapping_mul(j as u64 + 1))
    })
}

/// `h1 ^ (h2 << 16)` with `h1` seeded by `seed` and `h2` by `seed * 37`.
#[must_use]
pub fn combined_hash(text: &[u8], seed: u64) -> u64 {
    let h1 = positional_hash(text, seed);
    let h2 = positional_hash(text, seed.wrapping_mul(SECOND_SEED_FACTOR));
    h1 ^ (h2 << COMBINE_SHIFT)
}

/// `sin((hash mod 2^31) / 2^31 · 2π)` rounded to f32.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn hash_to_unit(hash: u64) -> f32 {
    let fraction = (hash % ANGLE_SCALE) as f64 / ANGLE_SCALE as f64;
    sine::sin(fraction * TAU) as f32
}

/// The positional hash of one text, reusable for every seed.
///
/// The hash is affine in its seed: `h(seed) = seed·31^n + h(0)` modulo 2^64,
/// so one pass over the text serves all output indices.
#[derive(Debug, Clone, Copy)]
struct SeededHash {
    unseeded: u64,
    seed_weight: u64,
}

impl SeededHash {
    fn new(text: &[u8]) -> Self {
        let seed_weight = text
            .iter()
            .fold(1u64, |acc, _| acc.wrapping_mul(HASH_BASE));
        Self {
            unseeded: positional_hash(text, 0),
            seed_weight,
        }
    }

    #[inline]
    const fn with_seed(self, seed: u64) -> u64 {
        seed.wrapping_mul(self.seed_weight).wrapping_add(self.unseeded)
    }

    #[inline]
    const fn combined(self, seed: u64) -> u64 {
        let h1 = self.with_seed(seed);
        let h2 = self.with_seed(seed.wrapping_mul(SECOND_SEED_FACTOR));
        h1 ^ (h2 << COMBINE_SHIFT)
    }
}

/// Write the hash embedding of `text` into `output[..dimension]`.
///
/// `dimension` 0 selects the default (128). Validation runs before any
/// hashing: text length first, then dimension, then output capacity.
/// Returns the dimension actually written.
pub fn generate(text: &[u8], output: &mut [f32], dimension: usize) -> Result<Dimension> {
    dimension::validate_text(text)?;
    let dim = Dimension::resolve(dimension)?;
    dimension::validate_output(output.len(), dim.get())?;
    fill(text, &mut output[..dim.get()]);
    Ok(dim)
}

fn fill(text: &[u8], output: &mut [f32]) {
    let hash = SeededHash::new(text);
    for (index, slot) in output.iter_mut().enumerate() {
        *slot = hash_to_unit(hash.combined(index as u64));
    }
}

/// Embed each text into the matching output, in order.
///
/// Stops at the first failure. Outputs before the failing index hold their
/// embeddings; the failing output and everything after it are left exactly
/// as supplied.
pub fn batch_generate<T: AsRef<[u8]>>(
    texts: &[T],
    outputs: &mut [&mut [f32]],
    dimension: usize,
) -> Result<Dimension> {
    if texts.is_empty() {
        return Err(EmbedError::invalid("batch is empty"));
    }
    if texts.len() != outputs.len() {
        return Err(EmbedError::invalid(format!(
            "{} texts but {} output buffers",
            texts.len(),
            outputs.len()
        )));
    }
    let dim = Dimension::resolve(dimension)?;

    for (index, (text, output)) in texts.iter().zip(outputs.iter_mut()).enumerate() {
        if let Err(err) = generate(text.as_ref(), output, dim.get()) {
            tracing::warn!(index, error = %err, "batch embedding aborted");
            return Err(EmbedError::Batch {
                completed: index,
                source: Box::new(err),
            });
        }
    }
    tracing::debug!(count = texts.len(), dimension = dim.get(), "batch embedded");
    Ok(dim)
}

/// Owned-vector front end to the hash kernel.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashEmbedder {
    dimension: Dimension,
}

impl HashEmbedder {
    #[must_use]
    pub const fn new(dimension: Dimension) -> Self {
        Self { dimension }
    }

    /// `0` selects the default dimension.
    pub fn with_dimension(dimension: usize) -> Result<Self> {
        Ok(Self::new(Dimension::resolve(dimension)?))
    }

    #[must_use]
    pub const fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Embed text into a new vector.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_bytes(text.as_bytes())
    }

    pub fn embed_bytes(&self, text: &[u8]) -> Result<Vec<f32>> {
        let mut output = vec![0.0; self.dimension.get()];
        generate(text, &mut output, self.dimension.get())?;
        Ok(output)
    }

    pub fn embed_batch<T: AsRef<str>>(&self, texts: &[T]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|text| self.embed(text.as_ref())).collect()
    }

    /// Cosine similarity between two texts' embeddings.
    pub fn similarity(&self, a: &str, b: &str) -> Result<f32> {
        let left = self.embed(a)?;
        let right = self.embed(b)?;
        vector::cosine_similarity(&left, &right)
    }
}
