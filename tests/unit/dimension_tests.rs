use fastembed_native::core::{Dimension, SUPPORTED_DIMENSIONS};
use fastembed_native::test_utils::{TestCase, run_table_tests};

#[test]
fn dimension_resolution_table() -> Result<(), String> {
    let cases = vec![
        TestCase::new("zero_is_default", 0usize, Some(128usize)),
        TestCase::new("smallest", 128, Some(128)),
        TestCase::new("largest", 2048, Some(2048)),
        TestCase::new("model_only_384", 384, None),
        TestCase::new("off_by_one", 129, None),
        TestCase::new("too_large", 4096, None),
    ];

    run_table_tests(cases, |requested| {
        Dimension::resolve(requested).ok().map(Dimension::get)
    })
}

#[test]
fn registry_is_sorted_and_closed() {
    let mut sorted = SUPPORTED_DIMENSIONS;
    sorted.sort_unstable();
    assert_eq!(sorted, SUPPORTED_DIMENSIONS);
    assert!(Dimension::all().all(|d| Dimension::is_supported(d.get())));
}
