//! # Trie Greedy-Match Encoder
//!
//! Repeatedly consumes the longest vocabulary entry prefixing the
//! remaining span; unmatched positions consume one codepoint.

use std::sync::Arc;

use crate::encoders::{EncodeScratch, SpanEncoder};
use crate::errors::TlResult;
use crate::types::TokenType;
use crate::vocab::{SpecialVocab, TrieVocab};

/// What an unmatched position maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrieFallback<T> {
    /// Emit the unk id for the consumed unit.
    Unk(T),

    /// Drop the consumed unit silently.
    Drop,
}

/// A [`SpanEncoder`] applying trie-based greedy longest matching.
#[derive(Debug, Clone)]
pub struct TrieEncoder<T: TokenType> {
    trie: Arc<TrieVocab<T>>,
    fallback: TrieFallback<T>,
}

impl<T: TokenType> TrieEncoder<T> {
    /// Build a trie encoder.
    ///
    /// ## Arguments
    /// * `trie` - The prefix tree over token byte sequences.
    /// * `specials` - Special slots; the unk slot is required unless
    ///   `drop_unmatched` is set.
    /// * `drop_unmatched` - Drop unmatched units instead of emitting
    ///   unk.
    ///
    /// ## Returns
    /// A `TlResult<TrieEncoder>`.
    pub fn try_new(
        trie: Arc<TrieVocab<T>>,
        specials: &SpecialVocab<T>,
        drop_unmatched: bool,
    ) -> TlResult<Self> {
        let fallback = if drop_unmatched {
            TrieFallback::Drop
        } else {
            TrieFallback::Unk(specials.require_unk()?)
        };

        Ok(Self { trie, fallback })
    }

    /// The configured fallback policy.
    pub fn fallback(&self) -> TrieFallback<T> {
        self.fallback
    }
}

/// Length of the UTF-8 sequence starting with this byte.
fn utf8_step(lead: u8) -> usize {
    match lead {
        b if b >= 0xF0 => 4,
        b if b >= 0xE0 => 3,
        b if b >= 0xC0 => 2,
        _ => 1,
    }
}

impl<T: TokenType> SpanEncoder<T> for TrieEncoder<T> {
    fn encode_append(
        &self,
        span: &str,
        tokens: &mut Vec<T>,
        _scratch: &mut EncodeScratch<T>,
    ) {
        let bytes = span.as_bytes();
        let mut pos = 0;

        while pos < bytes.len() {
            match self.trie.longest_match(&bytes[pos..]) {
                Some((len, token)) => {
                    tokens.push(token);
                    pos += len;
                }
                None => {
                    match self.fallback {
                        TrieFallback::Unk(unk) => tokens.push(unk),
                        TrieFallback::Drop => {}
                    }
                    pos += utf8_step(bytes[pos]);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type T = u32;

    fn hello_trie() -> Arc<TrieVocab<T>> {
        Arc::new(TrieVocab::try_from_pairs([("He", 0), ("Hello", 1), ("llo", 2)]).unwrap())
    }

    #[test]
    fn test_longest_prefix_wins() {
        let specials = SpecialVocab::default().with_unk("<unk>", 9);
        let encoder = TrieEncoder::try_new(hello_trie(), &specials, false).unwrap();

        // "Hello" (len 5) beats "He" (len 2) at position 0.
        assert_eq!(encoder.encode_span("Hello"), vec![1]);
        assert_eq!(encoder.encode_span("Hellollo"), vec![1, 2]);
    }

    #[test]
    fn test_unmatched_units_map_to_unk() {
        let specials = SpecialVocab::default().with_unk("<unk>", 9);
        let encoder = TrieEncoder::try_new(hello_trie(), &specials, false).unwrap();

        assert_eq!(encoder.encode_span("xHello"), vec![9, 1]);
        // One unk per codepoint, not per byte.
        assert_eq!(encoder.encode_span("é"), vec![9]);
    }

    #[test]
    fn test_drop_fallback() {
        let encoder = TrieEncoder::try_new(hello_trie(), &SpecialVocab::default(), true).unwrap();

        assert_eq!(encoder.fallback(), TrieFallback::Drop);
        assert_eq!(encoder.encode_span("xHello!"), vec![1]);
    }

    #[test]
    fn test_unk_required_unless_dropping() {
        assert!(TrieEncoder::try_new(hello_trie(), &SpecialVocab::default(), false).is_err());
    }
}
