//! Neural embedding loader.
//!
//! Resolves a model path to the cached session (loading it on a miss),
//! tokenizes the text, runs inference and returns the normalized summary-token
//! vector. Every failure is also recorded as the cache's last error.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::cache::{CacheState, ModelCache, ModelSession};
use super::runtime::{InferenceRuntime, declared_dimension};
use crate::core::dimension;
use crate::embed::{EncodedInput, WordHashTokenizer};
use crate::error::{EmbedError, Result};
use crate::vector::Kernel;

/// Allowed distance of a normalized output's norm from 1.0.
const UNIT_NORM_TOLERANCE: f32 = 1e-3;

pub struct NeuralLoader {
    runtime: Arc<dyn InferenceRuntime>,
    cache: Arc<ModelCache>,
    tokenizer: WordHashTokenizer,
    kernel: Kernel,
}

impl NeuralLoader {
    pub fn new(runtime: Arc<dyn InferenceRuntime>, cache: Arc<ModelCache>) -> Self {
        Self {
            runtime,
            cache,
            tokenizer: WordHashTokenizer::default(),
            kernel: Kernel::global(),
        }
    }

    #[must_use]
    pub const fn with_tokenizer(mut self, tokenizer: WordHashTokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    #[must_use]
    pub const fn with_kernel(mut self, kernel: Kernel) -> Self {
        self.kernel = kernel;
        self
    }

    pub const fn cache(&self) -> &Arc<ModelCache> {
        &self.cache
    }

    /// Output dimension of the model at `path`, loading it if it is not the
    /// cached session.
    pub fn model_dimension(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        self.with_state(|state| {
            let session = self.ensure_session(state, path)?;
            Ok(session.dimension)
        })
    }

    /// Embed `text` with the model at `path` into `output[..dim]`.
    ///
    /// `dimension` 0 means "whatever the model produces"; any other value must
    /// equal the model's dimension. Returns the number of floats written.
    /// `output` is untouched on failure.
    pub fn generate(
        &self,
        path: impl AsRef<Path>,
        text: &[u8],
        output: &mut [f32],
        dimension: usize,
    ) -> Result<usize> {
        let path = path.as_ref();
        self.with_state(|state| {
            dimension::validate_text(text)?;

            let session = self.ensure_session(state, path)?;
            let dim = match dimension {
                0 => session.dimension,
                requested if requested == session.dimension => requested,
                requested => {
                    return Err(EmbedError::DimensionMismatch {
                        expected: session.dimension,
                        actual: requested,
                    });
                }
            };
            dimension::validate_output(output.len(), dim)?;

            let encoded = self.tokenizer.encode(text)?;
            let started = Instant::now();
            let embedding = match self.infer(session, &encoded, dim) {
                Ok(embedding) => embedding,
                Err(err) => {
                    state.stats.inference_failures += 1;
                    return Err(err);
                }
            };
            debug!(
                tokens = encoded.len(),
                dim,
                elapsed_us = started.elapsed().as_micros(),
                "neural embedding generated"
            );

            output[..dim].copy_from_slice(&embedding);
            Ok(dim)
        })
    }

    /// Convenience wrapper returning an owned vector at the model's dimension.
    pub fn embed(&self, path: impl AsRef<Path>, text: &str) -> Result<Vec<f32>> {
        let dim = self.model_dimension(path.as_ref())?;
        let mut output = vec![0.0; dim];
        self.generate(path, text.as_bytes(), &mut output, dim)?;
        Ok(output)
    }

    pub fn unload(&self) {
        self.cache.unload();
    }

    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.cache.last_error()
    }

    fn with_state<T>(&self, op: impl FnOnce(&mut CacheState) -> Result<T>) -> Result<T> {
        let mut state = self.cache.lock();
        let result = op(&mut state);
        if let Err(err) = &result {
            warn!(code = err.code(), error = %err, "neural embedding failed");
            state.last_error = Some(err.to_string());
        }
        result
    }

    /// The cached session for `path`, loading it (after evicting any other
    /// model) on a miss. A failed load leaves the cache empty.
    fn ensure_session<'a>(
        &self,
        state: &'a mut CacheState,
        path: &Path,
    ) -> Result<&'a mut ModelSession> {
        let resolved = std::fs::canonicalize(path).map_err(|err| {
            EmbedError::ModelLoadFailure(format!("cannot resolve {}: {err}", path.display()))
        })?;

        if state.holds(&resolved) {
            state.stats.hits += 1;
        } else {
            state.evict();
            let session = self.load(state, resolved)?;
            state.slot = Some(session);
        }

        state
            .slot
            .as_mut()
            .ok_or_else(|| EmbedError::ModelLoadFailure("model session missing after load".into()))
    }

    fn load(&self, state: &mut CacheState, path: PathBuf) -> Result<ModelSession> {
        let started = Instant::now();
        state.stats.loads += 1;

        let loaded = self
            .runtime
            .load(&path)
            .map_err(|err| format!("{}: {err:#}", path.display()))
            .and_then(|handle| {
                let shape = handle.output_shape();
                let dimension = declared_dimension(&shape)
                    .and_then(dimension::validate_model_dimension)
                    .map_err(|msg| format!("{}: {msg}", path.display()))?;
                Ok((handle, dimension))
            });

        match loaded {
            Ok((handle, dimension)) => {
                info!(
                    path = %path.display(),
                    runtime = self.runtime.name(),
                    dimension,
                    elapsed_ms = started.elapsed().as_millis(),
                    "loaded model session"
                );
                Ok(ModelSession {
                    path,
                    dimension,
                    handle,
                    loaded_at: Instant::now(),
                })
            }
            Err(msg) => {
                state.stats.load_failures += 1;
                Err(EmbedError::ModelLoadFailure(msg))
            }
        }
    }

    fn infer(
        &self,
        session: &mut ModelSession,
        encoded: &EncodedInput,
        dim: usize,
    ) -> Result<Vec<f32>> {
        let mut raw = session
            .handle
            .run(encoded)
            .map_err(|err| EmbedError::InferenceFailure(format!("{err:#}")))?;
        if raw.len() < dim {
            return Err(EmbedError::InferenceFailure(format!(
                "model returned {} values, {dim} expected",
                raw.len()
            )));
        }
        raw.truncate(dim);
        if raw.iter().any(|v| !v.is_finite()) {
            return Err(EmbedError::InferenceFailure(
                "model output contains non-finite values".into(),
            ));
        }

        if raw.iter().all(|v| *v == 0.0) {
            return Err(EmbedError::InferenceFailure(
                "model output is a zero vector".into(),
            ));
        }
        self.kernel.normalize(&mut raw);
        let norm = self.kernel.vector_norm(&raw);
        if (norm - 1.0).abs() > UNIT_NORM_TOLERANCE {
            return Err(EmbedError::InferenceFailure(format!(
                "normalized model output has norm {norm}"
            )));
        }
        Ok(raw)
    }
}

impl std::fmt::Debug for NeuralLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NeuralLoader")
            .field("runtime", &self.runtime.name())
            .field("cache", &self.cache)
            .field("tokenizer", &self.tokenizer)
            .field("kernel", &self.kernel)
            .finish()
    }
}
