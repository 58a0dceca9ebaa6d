//! Runtime selection between the SIMD and scalar kernel implementations.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{EmbedError, Result};

/// Environment variable that pins the process-wide backend.
pub const BACKEND_ENV: &str = "FASTEMBED_KERNEL_BACKEND";

static GLOBAL: OnceLock<Backend> = OnceLock::new();

/// Which implementation of the vector loops to run.
///
/// Both backends accumulate in eight lanes in the same order with unfused
/// multiply/add, so they return bit-identical results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Simd,
    Scalar,
}

impl Backend {
    /// Pick the SIMD path when the CPU has a vector unit `wide` can use.
    #[must_use]
    pub fn detect() -> Self {
        if simd_available() {
            Self::Simd
        } else {
            Self::Scalar
        }
    }

    /// The process-wide backend: `FASTEMBED_KERNEL_BACKEND` if set to a valid
    /// value, otherwise [`Backend::detect`]. Resolved once.
    pub fn global() -> Self {
        *GLOBAL.get_or_init(|| {
            let backend = match std::env::var(BACKEND_ENV) {
                Ok(raw) => match Self::from_choice(&raw) {
                    Ok(backend) => backend,
                    Err(err) => {
                        tracing::warn!(value = %raw, error = %err, "ignoring invalid kernel backend");
                        Self::detect()
                    }
                },
                Err(_) => Self::detect(),
            };
            tracing::trace!(backend = %backend, "vector kernel backend selected");
            backend
        })
    }

    /// Parse `auto`, `simd` or `scalar`. `auto` detects; an explicit `simd`
    /// on a CPU without vector support falls back to scalar.
    pub fn from_choice(choice: &str) -> Result<Self> {
        match choice.trim().to_lowercase().as_str() {
            "auto" | "" => Ok(Self::detect()),
            other => {
                let requested = other.parse::<Self>()?;
                if requested == Self::Simd && !simd_available() {
                    tracing::warn!("SIMD backend requested but unavailable, using scalar");
                    return Ok(Self::Scalar);
                }
                Ok(requested)
            }
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Simd => "simd",
            Self::Scalar => "scalar",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = EmbedError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "simd" => Ok(Self::Simd),
            "scalar" => Ok(Self::Scalar),
            other => Err(EmbedError::Config(format!(
                "unknown kernel backend {other} (expected auto|simd|scalar)"
            ))),
        }
    }
}

#[cfg(target_arch = "x86_64")]
fn simd_available() -> bool {
    std::arch::is_x86_feature_detected!("sse2")
}

#[cfg(target_arch = "aarch64")]
fn simd_available() -> bool {
    std::arch::is_aarch64_feature_detected!("neon")
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn simd_available() -> bool {
    false
}
