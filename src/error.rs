//! Error taxonomy for the embedding kernels, the neural loader and the CLI.

use thiserror::Error;

/// Stable, machine-readable classification of an [`EmbedError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    ModelLoadFailure,
    DimensionMismatch,
    InferenceFailure,
    Config,
    Io,
    Serialization,
}

impl ErrorKind {
    /// Snake-case code used in robot output and logs.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::ModelLoadFailure => "model_load_failure",
            Self::DimensionMismatch => "dimension_mismatch",
            Self::InferenceFailure => "inference_failure",
            Self::Config => "config",
            Self::Io => "io",
            Self::Serialization => "serialization",
        }
    }
}

#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("model load failed: {0}")]
    ModelLoadFailure(String),

    #[error("dimension mismatch: model produces {expected}, caller requested {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("inference failed: {0}")]
    InferenceFailure(String),

    /// A batch stopped early; outputs `[0, completed)` hold valid embeddings.
    #[error("batch aborted after {completed} item(s): {source}")]
    Batch {
        completed: usize,
        #[source]
        source: Box<EmbedError>,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EmbedError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::ModelLoadFailure(_) => ErrorKind::ModelLoadFailure,
            Self::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            Self::InferenceFailure(_) => ErrorKind::InferenceFailure,
            Self::Batch { source, .. } => source.kind(),
            Self::Config(_) => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Io,
            Self::Serialization(_) => ErrorKind::Serialization,
        }
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, EmbedError>;
