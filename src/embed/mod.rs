//! Text-to-vector front ends: the hash kernel and the neural tokenizer.

pub mod hash;
mod sine;
pub mod tokenizer;

pub use hash::{HashEmbedder, batch_generate, generate};
pub use tokenizer::{EncodedInput, WordHashTokenizer};
