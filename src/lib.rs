//! fastembed-native
//!
//! Deterministic hash embeddings, a SIMD vector kernel and a cached neural
//! embedding loader, exposed to Rust callers and over a C ABI.

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod embed;
pub mod error;
#[allow(unsafe_code)]
pub mod ffi;
pub mod neural;
pub mod test_utils;
pub mod vector;

pub use error::{EmbedError, ErrorKind, Result};
