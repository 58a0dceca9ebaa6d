//! Word-hash tokenizer for BERT-family models.
//!
//! Splits on ASCII whitespace and punctuation, maps each lowercased word to a
//! vocabulary id by hashing, and wraps the sequence in `[CLS]` / `[SEP]`.

use serde::Serialize;

use crate::core::dimension;
use crate::error::Result;

pub const CLS_TOKEN_ID: i64 = 101;
pub const SEP_TOKEN_ID: i64 = 102;
/// Ids below this are reserved for special tokens.
pub const FIRST_WORD_ID: i64 = 100;
pub const DEFAULT_VOCAB_SIZE: u32 = 30_528;
const MIN_VOCAB_SIZE: u32 = 101;
pub const DEFAULT_MAX_SEQUENCE_LENGTH: usize = dimension::MAX_TEXT_LENGTH;

/// Model inputs for a single sequence, batch size 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedInput {
    pub input_ids: Vec<i64>,
    pub token_type_ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
}

impl EncodedInput {
    #[must_use]
    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }

    /// Tensor shape `[1, sequence_length]`.
    #[must_use]
    pub fn shape(&self) -> [usize; 2] {
        [1, self.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordHashTokenizer {
    vocab_size: u32,
    max_length: usize,
}

impl Default for WordHashTokenizer {
    fn default() -> Self {
        Self {
            vocab_size: DEFAULT_VOCAB_SIZE,
            max_length: DEFAULT_MAX_SEQUENCE_LENGTH,
        }
    }
}

impl WordHashTokenizer {
    /// `max_length` counts `[CLS]` and `[SEP]`; it is raised to 2 if smaller.
    #[must_use]
    pub fn new(vocab_size: u32, max_length: usize) -> Self {
        Self {
            vocab_size: vocab_size.max(MIN_VOCAB_SIZE),
            max_length: max_length.max(2),
        }
    }

    #[must_use]
    pub const fn max_length(&self) -> usize {
        self.max_length
    }

    /// Token ids for `text`, after the same length checks as the hash kernel.
    pub fn encode_ids(&self, text: &[u8]) -> Result<Vec<i64>> {
        dimension::validate_text(text)?;

        let word_budget = self.max_length - 2;
        let mut ids = Vec::with_capacity(text.len().min(word_budget) + 2);
        ids.push(CLS_TOKEN_ID);

        let mut hash: u32 = 0;
        let mut in_word = false;
        for &byte in text {
            if ids.len() > word_budget {
                break;
            }
            if byte.is_ascii_whitespace() || byte.is_ascii_punctuation() {
                if in_word {
                    ids.push(self.word_id(hash));
                    hash = 0;
                    in_word = false;
                }
            } else {
                hash = hash
                    .wrapping_mul(31)
                    .wrapping_add(u32::from(byte.to_ascii_lowercase()));
                in_word = true;
            }
        }
        if in_word && ids.len() <= word_budget {
            ids.push(self.word_id(hash));
        }

        ids.push(SEP_TOKEN_ID);
        Ok(ids)
    }

    pub fn encode(&self, text: &[u8]) -> Result<EncodedInput> {
        let input_ids = self.encode_ids(text)?;
        let len = input_ids.len();
        Ok(EncodedInput {
            input_ids,
            token_type_ids: vec![0; len],
            attention_mask: vec![1; len],
        })
    }

    fn word_id(&self, hash: u32) -> i64 {
        let id = i64::from(hash % self.vocab_size);
        if id < FIRST_WORD_ID { id + FIRST_WORD_ID } else { id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_hash(word: &str) -> u32 {
        word.bytes()
            .fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(u32::from(b)))
    }

    #[test]
    fn wraps_words_in_special_tokens() {
        let ids = WordHashTokenizer::default().encode_ids(b"Hello, world!").unwrap();
        assert_eq!(ids.len(), 4);
        assert_eq!(ids[0], CLS_TOKEN_ID);
        assert_eq!(ids[3], SEP_TOKEN_ID);
        assert_eq!(ids[1], i64::from(word_hash("hello") % DEFAULT_VOCAB_SIZE));
    }

    #[test]
    fn case_insensitive() {
        let tokenizer = WordHashTokenizer::default();
        assert_eq!(
            tokenizer.encode_ids(b"Rust IS Fast").unwrap(),
            tokenizer.encode_ids(b"rust is fast").unwrap()
        );
    }

    #[test]
    fn punctuation_only_yields_special_tokens() {
        let ids = WordHashTokenizer::default().encode_ids(b" ... !! ").unwrap();
        assert_eq!(ids, vec![CLS_TOKEN_ID, SEP_TOKEN_ID]);
    }

    #[test]
    fn low_ids_are_shifted_past_special_tokens() {
        // 'a' hashes to 97, below the reserved range.
        let ids = WordHashTokenizer::default().encode_ids(b"a").unwrap();
        assert_eq!(ids[1], 197);
        assert!(ids[1..ids.len() - 1].iter().all(|id| *id >= FIRST_WORD_ID));
    }

    #[test]
    fn truncates_to_max_length() {
        let tokenizer = WordHashTokenizer::new(DEFAULT_VOCAB_SIZE, 5);
        let ids = tokenizer.encode_ids(b"one two three four five six").unwrap();
        assert_eq!(ids.len(), 5);
        assert_eq!(ids[0], CLS_TOKEN_ID);
        assert_eq!(*ids.last().unwrap(), SEP_TOKEN_ID);
    }

    #[test]
    fn encode_builds_masks() {
        let input = WordHashTokenizer::default().encode(b"two words").unwrap();
        assert_eq!(input.shape(), [1, 4]);
        assert!(input.token_type_ids.iter().all(|v| *v == 0));
        assert!(input.attention_mask.iter().all(|v| *v == 1));
    }

    #[test]
    fn rejects_empty_text() {
        assert!(WordHashTokenizer::default().encode(b"").is_err());
    }
}
