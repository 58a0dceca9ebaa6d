//! The inference capability the neural loader is built on.
//!
//! Model parsing, tensor plumbing and forward passes live in an external
//! runtime (ONNX Runtime, candle, a remote service). Hosts adapt theirs to
//! these two traits and hand it to [`crate::neural::NeuralLoader`].

use std::path::Path;

use crate::embed::EncodedInput;

/// Loads models. Shared across threads; the loader serializes calls.
pub trait InferenceRuntime: Send + Sync {
    /// Load the model stored at `path` (already canonicalized) far enough to
    /// report its output shape and run inference.
    fn load(&self, path: &Path) -> anyhow::Result<Box<dyn ModelHandle>>;

    /// Short name for diagnostics.
    fn name(&self) -> &str {
        "inference-runtime"
    }
}

/// A loaded model. Dropping the handle releases it.
pub trait ModelHandle: Send {
    /// Declared shape of the first output, e.g. `[-1, -1, 768]` for
    /// `last_hidden_state` or `[-1, 384]` for a pooled output. Dynamic axes
    /// are negative; the last axis must be fixed.
    fn output_shape(&self) -> Vec<i64>;

    /// Forward pass over one sequence. Returns the first output flattened in
    /// row-major order; its first `dimension` values are the summary token.
    fn run(&mut self, input: &EncodedInput) -> anyhow::Result<Vec<f32>>;
}

/// Output dimension declared by `shape`: its last axis.
pub(crate) fn declared_dimension(shape: &[i64]) -> std::result::Result<usize, String> {
    let last = shape
        .last()
        .copied()
        .ok_or_else(|| "model declares a scalar output".to_string())?;
    if last <= 0 {
        return Err(format!("model output shape {shape:?} has a dynamic last axis"));
    }
    usize::try_from(last).map_err(|err| format!("model output axis {last}: {err}"))
}
