//! Neural embedding path: a pluggable inference runtime behind a single-slot
//! model cache.

pub mod cache;
pub mod loader;
pub mod runtime;

pub use cache::{CacheStats, ModelCache, SessionInfo, SessionStatus};
pub use loader::NeuralLoader;
pub use runtime::{InferenceRuntime, ModelHandle};
