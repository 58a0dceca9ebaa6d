use fastembed_native::embed::{HashEmbedder, batch_generate, generate};
use fastembed_native::test_utils::{TestCase, run_table_tests};
use fastembed_native::{EmbedError, ErrorKind};

#[test]
fn hash_embedding_dimensions_table() -> Result<(), String> {
    let cases = vec![
        TestCase::new("default", (0usize, "git commit workflow"), Ok(128usize)),
        TestCase::new("dims_256", (256, "skill search"), Ok(256)),
        TestCase::new("dims_2048", (2048, "x"), Ok(2048)),
        TestCase::new("dims_100", (100, "text"), Err(ErrorKind::InvalidArgument)),
        TestCase::new("dims_4096", (4096, "text"), Err(ErrorKind::InvalidArgument)),
        TestCase::new("empty_text", (128, ""), Err(ErrorKind::InvalidArgument)),
    ];

    run_table_tests(cases, |(dim, text)| {
        let mut out = vec![0.0f32; 4096];
        generate(text.as_bytes(), &mut out, dim)
            .map(|d| d.get())
            .map_err(|e| e.kind())
    })
}

#[test]
fn text_length_limit_is_inclusive() {
    let mut out = vec![0.0f32; 128];
    assert!(generate(&vec![b'a'; 8192], &mut out, 128).is_ok());
    let err = generate(&vec![b'a'; 9000], &mut out, 128).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn writes_only_the_requested_prefix() {
    let mut out = vec![42.0f32; 300];
    generate(b"prefix only", &mut out, 256).unwrap();
    assert!(out[..256].iter().all(|v| (-1.0..=1.0).contains(v)));
    assert!(out[256..].iter().all(|v| *v == 42.0));
}

#[test]
fn undersized_output_is_rejected_untouched() {
    let mut out = vec![5.0f32; 64];
    assert!(generate(b"text", &mut out, 128).is_err());
    assert!(out.iter().all(|v| *v == 5.0));
}

#[test]
fn word_order_changes_the_embedding() {
    let embedder = HashEmbedder::default();
    let similarity = embedder.similarity("Hello world", "world Hello").unwrap();
    assert!(similarity < 0.95, "similarity {similarity}");
}

#[test]
fn one_byte_change_is_visible() {
    for dim in [128, 256, 512, 768, 1024, 2048] {
        let embedder = HashEmbedder::with_dimension(dim).unwrap();
        let similarity = embedder.similarity("Hello world", "Hello worlx").unwrap();
        assert!(similarity < 0.99, "dim {dim}: similarity {similarity}");
    }
}

#[test]
fn batch_matches_single_calls() {
    let texts = ["alpha", "beta", "gamma"];
    let mut a = vec![0.0f32; 512];
    let mut b = vec![0.0f32; 512];
    let mut c = vec![0.0f32; 512];
    let mut outputs = vec![a.as_mut_slice(), b.as_mut_slice(), c.as_mut_slice()];
    batch_generate(&texts, &mut outputs, 512).unwrap();

    let embedder = HashEmbedder::with_dimension(512).unwrap();
    for (text, output) in texts.iter().zip(&outputs) {
        assert_eq!(embedder.embed(text).unwrap(), output.to_vec());
    }
}

#[test]
fn batch_failure_reports_completed_count() {
    let texts: [&[u8]; 3] = [b"ok", b"", b"never reached"];
    let mut a = vec![9.0f32; 128];
    let mut b = vec![9.0f32; 128];
    let mut c = vec![9.0f32; 128];
    let mut outputs = vec![a.as_mut_slice(), b.as_mut_slice(), c.as_mut_slice()];

    let err = batch_generate(&texts, &mut outputs, 128).unwrap_err();
    match &err {
        EmbedError::Batch { completed, source } => {
            assert_eq!(*completed, 1);
            assert_eq!(source.kind(), ErrorKind::InvalidArgument);
        }
        other => panic!("expected batch error, got {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(outputs[0].iter().any(|v| *v != 9.0));
    assert!(outputs[1].iter().all(|v| *v == 9.0));
    assert!(outputs[2].iter().all(|v| *v == 9.0));
}

#[test]
fn batch_shape_errors() {
    let mut a = vec![0.0f32; 128];
    let mut outputs = vec![a.as_mut_slice()];
    let none: [&str; 0] = [];
    assert!(batch_generate(&none, &mut [], 128).is_err());
    assert!(batch_generate(&["a", "b"], &mut outputs, 128).is_err());
}
