//! Dimension registry: the supported output sizes and input limits shared by
//! the hash kernel and the neural loader.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EmbedError, Result};

/// Output sizes accepted by the hash kernel.
pub const SUPPORTED_DIMENSIONS: [usize; 6] = [128, 256, 512, 768, 1024, 2048];

/// Dimension used when a hash caller passes 0.
pub const DEFAULT_HASH_DIMENSION: usize = 128;

/// Hard limit on input text, in bytes.
pub const MAX_TEXT_LENGTH: usize = 8192;

/// Largest output a neural model may declare.
pub const MAX_MODEL_DIMENSION: usize = 2048;

/// A validated embedding length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Dimension(usize);

impl Dimension {
    pub const D128: Self = Self(128);
    pub const D256: Self = Self(256);
    pub const D512: Self = Self(512);
    pub const D768: Self = Self(768);
    pub const D1024: Self = Self(1024);
    pub const D2048: Self = Self(2048);

    /// Resolve a caller-supplied hash dimension; 0 selects the default.
    pub fn resolve(requested: usize) -> Result<Self> {
        Self::resolve_or(requested, Self::default())
    }

    /// Like [`Dimension::resolve`] with a caller-chosen default for 0.
    pub fn resolve_or(requested: usize, default: Self) -> Result<Self> {
        if requested == 0 {
            return Ok(default);
        }
        Self::new(requested)
    }

    /// Accepts only members of [`SUPPORTED_DIMENSIONS`].
    pub fn new(value: usize) -> Result<Self> {
        if Self::is_supported(value) {
            Ok(Self(value))
        } else {
            Err(EmbedError::invalid(format!(
                "unsupported dimension {value} (expected one of {SUPPORTED_DIMENSIONS:?})"
            )))
        }
    }

    #[must_use]
    pub fn is_supported(value: usize) -> bool {
        SUPPORTED_DIMENSIONS.contains(&value)
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Self> {
        SUPPORTED_DIMENSIONS.into_iter().map(Self)
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Self(DEFAULT_HASH_DIMENSION)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<usize> for Dimension {
    type Error = EmbedError;

    fn try_from(value: usize) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Dimension> for usize {
    fn from(value: Dimension) -> Self {
        value.0
    }
}

/// Reject empty input and input over [`MAX_TEXT_LENGTH`] bytes.
pub fn validate_text(text: &[u8]) -> Result<()> {
    if text.is_empty() {
        return Err(EmbedError::invalid("text is empty"));
    }
    if text.len() > MAX_TEXT_LENGTH {
        return Err(EmbedError::invalid(format!(
            "text is {} bytes (limit {MAX_TEXT_LENGTH})",
            text.len()
        )));
    }
    Ok(())
}

/// Check that a caller buffer can hold `needed` floats.
pub(crate) fn validate_output(len: usize, needed: usize) -> Result<()> {
    if len < needed {
        return Err(EmbedError::invalid(format!(
            "output buffer holds {len} floats, {needed} required"
        )));
    }
    Ok(())
}

/// Check a dimension reported by a neural model.
pub(crate) fn validate_model_dimension(value: usize) -> std::result::Result<usize, String> {
    if value == 0 || value > MAX_MODEL_DIMENSION {
        return Err(format!(
            "model output dimension {value} outside 1..={MAX_MODEL_DIMENSION}"
        ));
    }
    Ok(value)
}
