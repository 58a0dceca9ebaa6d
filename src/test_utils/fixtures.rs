use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tempfile::TempDir;

use crate::embed::{EncodedInput, WordHashTokenizer};
use crate::neural::{InferenceRuntime, ModelHandle};

/// Temporary directory of placeholder model files.
///
/// The mock runtime never reads them; they only need to exist so paths
/// canonicalize.
pub struct ModelFiles {
    pub temp_dir: TempDir,
}

impl Default for ModelFiles {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelFiles {
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        println!("[FIXTURE] Created model dir: {:?}", temp_dir.path());
        Self { temp_dir }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a placeholder model file.
    #[must_use]
    pub fn model(&self, name: &str) -> PathBuf {
        let full_path = self.temp_dir.path().join(name);
        std::fs::write(&full_path, b"placeholder model").expect("Failed to write model file");
        println!("[FIXTURE] Created model: {full_path:?}");
        full_path
    }
}

/// Deterministic in-process runtime with scripted failures.
///
/// Outputs look like `last_hidden_state` (`[1, seq, dim]`) and depend only on
/// the token ids, so equal texts embed equally.
#[derive(Debug, Clone)]
pub struct MockRuntime {
    dimension: i64,
    loads: Arc<AtomicUsize>,
    failing_paths: Vec<String>,
    failing_token: Option<i64>,
    output_scale: f32,
}

impl MockRuntime {
    #[must_use]
    pub fn new(dimension: i64) -> Self {
        Self {
            dimension,
            loads: Arc::new(AtomicUsize::new(0)),
            failing_paths: Vec::new(),
            failing_token: None,
            output_scale: 1.0,
        }
    }

    /// Fail any load whose file name is `file_name`.
    #[must_use]
    pub fn fail_loading(mut self, file_name: &str) -> Self {
        self.failing_paths.push(file_name.to_string());
        self
    }

    /// Fail inference for inputs containing `word`.
    #[must_use]
    pub fn fail_inference_on(mut self, word: &str) -> Self {
        let ids = WordHashTokenizer::default()
            .encode_ids(word.as_bytes())
            .expect("word must tokenize");
        self.failing_token = ids.get(1).copied();
        self
    }

    #[must_use]
    pub const fn zero_output(self) -> Self {
        self.scale_output(0.0)
    }

    /// Multiply every output value by `factor`.
    #[must_use]
    pub const fn scale_output(mut self, factor: f32) -> Self {
        self.output_scale = factor;
        self
    }

    /// Number of `load` calls so far, failed ones included.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl InferenceRuntime for MockRuntime {
    fn load(&self, path: &Path) -> anyhow::Result<Box<dyn ModelHandle>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.failing_paths.contains(&file_name) {
            anyhow::bail!("corrupt model graph in {file_name}");
        }
        Ok(Box::new(MockModel {
            dimension: self.dimension,
            failing_token: self.failing_token,
            output_scale: self.output_scale,
        }))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

struct MockModel {
    dimension: i64,
    failing_token: Option<i64>,
    output_scale: f32,
}

impl ModelHandle for MockModel {
    fn output_shape(&self) -> Vec<i64> {
        vec![1, -1, self.dimension]
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_precision_loss)]
    fn run(&mut self, input: &EncodedInput) -> anyhow::Result<Vec<f32>> {
        if let Some(token) = self.failing_token {
            if input.input_ids.contains(&token) {
                anyhow::bail!("mock inference failure on token {token}");
            }
        }
        let dim = usize::try_from(self.dimension)?;
        let mut output = vec![0.0f32; input.len() * dim];
        for (position, row) in output.chunks_mut(dim).enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                let mix = input
                    .input_ids
                    .iter()
                    .enumerate()
                    .fold(position as i64 + 1, |acc, (k, id)| {
                        acc.wrapping_mul(31)
                            .wrapping_add(id * (k as i64 + 1) * (j as i64 + 1))
                    });
                *value = (mix.rem_euclid(2001) - 1000) as f32 / 1000.0 * self.output_scale;
            }
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_loads_and_fails_on_request() {
        let files = ModelFiles::new();
        let runtime = MockRuntime::new(8).fail_loading("bad.onnx");
        assert!(runtime.load(&files.model("good.onnx")).is_ok());
        assert!(runtime.load(&files.model("bad.onnx")).is_err());
        assert_eq!(runtime.load_count(), 2);
    }

    #[test]
    fn output_has_one_row_per_token() {
        let runtime = MockRuntime::new(8);
        let mut model = runtime.load(Path::new("m.onnx")).unwrap();
        let input = WordHashTokenizer::default().encode(b"two words").unwrap();
        let output = model.run(&input).unwrap();
        assert_eq!(output.len(), input.len() * 8);
        assert_eq!(model.output_shape(), vec![1, -1, 8]);
    }
}
