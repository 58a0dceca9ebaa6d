use std::sync::Arc;

use fastembed_native::assert_log_contains;
use fastembed_native::neural::{ModelCache, NeuralLoader, SessionStatus};
use fastembed_native::test_utils::fixtures::{MockRuntime, ModelFiles};
use fastembed_native::test_utils::logging::capture_logs;
use fastembed_native::{EmbedError, ErrorKind};
use tracing::Level;

#[test]
fn dimension_probe_then_generate_shares_one_load() {
    let files = ModelFiles::new();
    let model = files.model("minilm.onnx");
    let runtime = Arc::new(MockRuntime::new(384));
    let loader = NeuralLoader::new(runtime.clone(), Arc::new(ModelCache::new()));

    let dim = loader.model_dimension(&model).unwrap();
    let mut out = vec![0.0f32; dim];
    let written = loader.generate(&model, b"cache coherence", &mut out, 0).unwrap();

    assert_eq!(written, dim);
    assert_eq!(runtime.load_count(), 1);
}

#[test]
fn equivalent_paths_share_a_session() {
    let files = ModelFiles::new();
    let model = files.model("minilm.onnx");
    std::fs::create_dir(files.path().join("sub")).unwrap();
    let indirect = files.path().join("sub").join("..").join("minilm.onnx");
    let runtime = Arc::new(MockRuntime::new(384));
    let loader = NeuralLoader::new(runtime.clone(), Arc::new(ModelCache::new()));

    loader.model_dimension(&model).unwrap();
    loader.model_dimension(&indirect).unwrap();
    assert_eq!(runtime.load_count(), 1);
}

#[test]
fn loaders_sharing_a_cache_see_one_slot() {
    let files = ModelFiles::new();
    let a = files.model("a.onnx");
    let b = files.model("b.onnx");
    let cache = Arc::new(ModelCache::new());
    let runtime = Arc::new(MockRuntime::new(256));
    let first = NeuralLoader::new(runtime.clone(), Arc::clone(&cache));
    let second = NeuralLoader::new(runtime.clone(), Arc::clone(&cache));

    first.model_dimension(&a).unwrap();
    second.model_dimension(&b).unwrap();
    let current = cache.current().unwrap();
    assert!(current.path.ends_with("b.onnx"));
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn concurrent_generation_is_serialized() {
    let files = ModelFiles::new();
    let model = files.model("minilm.onnx");
    let runtime = Arc::new(MockRuntime::new(128));
    let loader = Arc::new(NeuralLoader::new(runtime.clone(), Arc::new(ModelCache::new())));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let loader = Arc::clone(&loader);
            let model = model.clone();
            std::thread::spawn(move || {
                let mut out = vec![0.0f32; 128];
                let text = format!("thread {i}");
                loader.generate(&model, text.as_bytes(), &mut out, 0).unwrap();
                out
            })
        })
        .collect();
    for handle in handles {
        let out = handle.join().unwrap();
        let norm = fastembed_native::vector::vector_norm(&out);
        assert!((norm - 1.0).abs() < 1e-5);
    }
    assert_eq!(runtime.load_count(), 1);
}

#[test]
fn failures_are_logged_and_recorded() {
    let files = ModelFiles::new();
    let model = files.model("broken.onnx");
    let runtime = Arc::new(MockRuntime::new(128).fail_loading("broken.onnx"));
    let loader = NeuralLoader::new(runtime, Arc::new(ModelCache::new()));

    let (result, logs) = capture_logs(|| loader.model_dimension(&model));
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ModelLoadFailure);
    assert_log_contains!(logs, Level::WARN, "neural embedding failed");
    assert!(loader.last_error().unwrap().contains("corrupt model graph"));
    assert_eq!(loader.cache().status(), SessionStatus::Unloaded);
}

#[test]
fn loads_are_logged() {
    let files = ModelFiles::new();
    let model = files.model("minilm.onnx");
    let loader = NeuralLoader::new(Arc::new(MockRuntime::new(64)), Arc::new(ModelCache::new()));

    let (dim, logs) = capture_logs(|| loader.model_dimension(&model));
    assert_eq!(dim.unwrap(), 64);
    assert_log_contains!(logs, Level::INFO, "loaded model session");
    let entry = &logs.at_level(Level::INFO)[0];
    assert_eq!(entry.field("dimension"), Some("64"));
}

#[test]
fn mismatch_reports_both_dimensions() {
    let files = ModelFiles::new();
    let model = files.model("minilm.onnx");
    let loader = NeuralLoader::new(Arc::new(MockRuntime::new(384)), Arc::new(ModelCache::new()));

    let mut out = vec![0.0f32; 512];
    let err = loader.generate(&model, b"text", &mut out, 512).unwrap_err();
    assert!(matches!(
        err,
        EmbedError::DimensionMismatch {
            expected: 384,
            actual: 512
        }
    ));
    assert!(loader.last_error().unwrap().contains("384"));
}
