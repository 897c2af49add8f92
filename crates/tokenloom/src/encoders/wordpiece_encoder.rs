//! # Greedy Longest-Prefix Encoder
//!
//! `WordPiece`-style matching: take the longest vocabulary prefix of the
//! remaining span, shrinking from the right; continuation pieces carry
//! the reserved marker so the decoder can rejoin them without a space.

use std::sync::Arc;

use crate::encoders::{EncodeScratch, SpanEncoder};
use crate::errors::TlResult;
use crate::types::TokenType;
use crate::vocab::{SpecialVocab, TokenVocab};

/// Reference guard: words longer than this map straight to unk.
const MAX_INPUT_CHARS_PER_WORD: usize = 100;

/// A [`SpanEncoder`] applying greedy longest-prefix matching.
///
/// A span with any position that matches no prefix down to length 1
/// maps to a single unk as a whole; partial piece chains are never
/// emitted for such spans.
#[derive(Debug, Clone)]
pub struct WordPieceEncoder<T: TokenType> {
    vocab: Arc<TokenVocab<T>>,
    continuation: String,
    unk: T,
}

impl<T: TokenType> WordPieceEncoder<T> {
    /// Build a `WordPiece` encoder.
    ///
    /// ## Arguments
    /// * `vocab` - The token vocabulary, with continuation-marked
    ///   subtoken entries.
    /// * `continuation` - The subword-continuation marker (`##` for the
    ///   reference family).
    /// * `specials` - Special slots; the unk slot is required.
    ///
    /// ## Returns
    /// A `TlResult<WordPieceEncoder>`.
    pub fn try_new(
        vocab: Arc<TokenVocab<T>>,
        continuation: impl Into<String>,
        specials: &SpecialVocab<T>,
    ) -> TlResult<Self> {
        Ok(Self {
            vocab,
            continuation: continuation.into(),
            unk: specials.require_unk()?,
        })
    }

    /// The configured continuation marker.
    pub fn continuation(&self) -> &str {
        &self.continuation
    }

    /// Match one span into pieces; `None` when any position fails.
    fn match_pieces(
        &self,
        span: &str,
    ) -> Option<Vec<T>> {
        let chars: Vec<char> = span.chars().collect();
        let mut pieces = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let mut end = chars.len();
            let mut found = None;

            while start < end {
                let mut piece: String = if start > 0 {
                    self.continuation.clone()
                } else {
                    String::new()
                };
                piece.extend(&chars[start..end]);

                if let Some(t) = self.vocab.lookup_str(&piece) {
                    found = Some(t);
                    break;
                }
                end -= 1;
            }

            pieces.push(found?);
            start = end;
        }

        Some(pieces)
    }
}

impl<T: TokenType> SpanEncoder<T> for WordPieceEncoder<T> {
    fn encode_append(
        &self,
        span: &str,
        tokens: &mut Vec<T>,
        _scratch: &mut EncodeScratch<T>,
    ) {
        if span.is_empty() {
            return;
        }
        if span.chars().count() > MAX_INPUT_CHARS_PER_WORD {
            tokens.push(self.unk);
            return;
        }

        match self.match_pieces(span) {
            Some(pieces) => tokens.extend(pieces),
            None => tokens.push(self.unk),
        }
    }
}
