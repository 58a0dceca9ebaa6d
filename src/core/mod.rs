//! Core types shared by every embedding path.

pub mod dimension;

pub use dimension::{
    DEFAULT_HASH_DIMENSION, Dimension, MAX_MODEL_DIMENSION, MAX_TEXT_LENGTH, SUPPORTED_DIMENSIONS,
    validate_text,
};
