//! Single-slot model cache.
//!
//! Holds at most one loaded model session, keyed by its canonical path.
//! Requesting a different model evicts the current one first. The cache is an
//! ordinary value: the composition root creates it, shares it through an
//! `Arc`, and every loader using it is serialized by its mutex.

use std::path::{Path, PathBuf};
use std::time::Instant;

use parking_lot::{Mutex, MutexGuard};
use serde::Serialize;

use super::runtime::ModelHandle;

/// A loaded model and what was learned while loading it.
pub(crate) struct ModelSession {
    pub(crate) path: PathBuf,
    pub(crate) dimension: usize,
    pub(crate) handle: Box<dyn ModelHandle>,
    pub(crate) loaded_at: Instant,
}

impl ModelSession {
    fn info(&self) -> SessionInfo {
        SessionInfo {
            path: self.path.clone(),
            dimension: self.dimension,
            status: SessionStatus::Loaded,
            age_ms: u64::try_from(self.loaded_at.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Unloaded,
    Loaded,
}

/// Snapshot of the cached session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub path: PathBuf,
    pub dimension: usize,
    pub status: SessionStatus,
    pub age_ms: u64,
}

/// Cache counters for monitoring and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Runtime load attempts.
    pub loads: u64,
    pub load_failures: u64,
    /// Requests served by the already-loaded session.
    pub hits: u64,
    /// Sessions dropped because another model was requested.
    pub evictions: u64,
    /// Sessions dropped by an explicit unload.
    pub unloads: u64,
    pub inference_failures: u64,
}

impl CacheStats {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.loads;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Default)]
pub(crate) struct CacheState {
    pub(crate) slot: Option<ModelSession>,
    pub(crate) stats: CacheStats,
    pub(crate) last_error: Option<String>,
}

impl CacheState {
    pub(crate) fn holds(&self, path: &Path) -> bool {
        self.slot.as_ref().is_some_and(|session| session.path == path)
    }

    /// Drop the current session, counting it as an eviction.
    pub(crate) fn evict(&mut self) {
        if let Some(old) = self.slot.take() {
            self.stats.evictions += 1;
            tracing::info!(path = %old.path.display(), "evicting model session");
        }
    }
}

#[derive(Default)]
pub struct ModelCache {
    state: Mutex<CacheState>,
}

impl ModelCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock()
    }

    /// Drop the cached session, if any. Always succeeds.
    pub fn unload(&self) {
        let mut state = self.state.lock();
        if let Some(old) = state.slot.take() {
            state.stats.unloads += 1;
            tracing::info!(path = %old.path.display(), "unloaded model session");
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.state.lock().slot.is_some()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        if self.is_loaded() {
            SessionStatus::Loaded
        } else {
            SessionStatus::Unloaded
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<SessionInfo> {
        self.state.lock().slot.as_ref().map(ModelSession::info)
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.state.lock().stats
    }

    /// Message of the most recent neural-path failure.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.state.lock().last_error.clone()
    }

    pub fn clear_last_error(&self) {
        self.state.lock().last_error = None;
    }

    /// Record a neural-path failure raised outside a loader call.
    pub(crate) fn record_error(&self, message: impl Into<String>) {
        self.state.lock().last_error = Some(message.into());
    }
}

impl std::fmt::Debug for ModelCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ModelCache")
            .field("session", &state.slot.as_ref().map(ModelSession::info))
            .field("stats", &state.stats)
            .field("last_error", &state.last_error)
            .finish()
    }
}
