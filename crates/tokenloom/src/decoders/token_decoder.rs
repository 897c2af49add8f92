//! # Id -> Text Decoder

use std::sync::Arc;

use crate::decoders::CleanupRules;
use crate::normalize::ByteLevel;
use crate::ragged::{PaddedBatch, RaggedBatch};
use crate::types::TokenType;
use crate::vocab::{SpecialVocab, TokenVocab};

/// Policy for ids outside the vocabulary's valid range.
///
/// Never an error: the choice between substitution and dropping is a
/// deliberate configuration, not undefined behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeUnknown {
    /// Substitute U+FFFD for the missing id.
    #[default]
    Replace,

    /// Drop the id, logging at warn level.
    Drop,
}

/// How decoded pieces re-join into output text, reversing the forward
/// pipeline's encoding convention.
#[derive(Debug, Clone)]
pub enum PieceJoiner {
    /// Concatenate raw token bytes.
    Plain,

    /// Concatenate, then invert the byte-level remapping table.
    ByteLevel(Arc<ByteLevel>),

    /// Strip the continuation marker and rejoin without a space;
    /// unmarked pieces start a new space-separated word.
    Continuation(String),

    /// Replace the word-prefix marker (`▁`) with a space.
    WordPrefix(String),
}

/// A token decoder over an immutable vocabulary.
#[derive(Debug, Clone)]
pub struct TokenDecoder<T: TokenType> {
    vocab: Arc<TokenVocab<T>>,
    specials: SpecialVocab<T>,
    joiner: PieceJoiner,
    unknown: DecodeUnknown,
    skip_special_tokens: bool,
    cleanup: Option<CleanupRules>,
}

impl<T: TokenType> TokenDecoder<T> {
    /// Build a decoder.
    ///
    /// ## Arguments
    /// * `vocab` - The token vocabulary.
    /// * `specials` - Special slots, used for filtering.
    /// * `joiner` - The piece re-join convention.
    pub fn new(
        vocab: Arc<TokenVocab<T>>,
        specials: SpecialVocab<T>,
        joiner: PieceJoiner,
    ) -> Self {
        Self {
            vocab,
            specials,
            joiner,
            unknown: DecodeUnknown::default(),
            skip_special_tokens: false,
            cleanup: None,
        }
    }

    /// Set the out-of-range id policy.
    pub fn with_unknown(
        mut self,
        unknown: DecodeUnknown,
    ) -> Self {
        self.unknown = unknown;
        self
    }

    /// Drop ids registered as specials from the output.
    pub fn with_skip_special_tokens(
        mut self,
        skip: bool,
    ) -> Self {
        self.skip_special_tokens = skip;
        self
    }

    /// Attach an artifact cleanup rule table.
    pub fn with_cleanup(
        mut self,
        cleanup: CleanupRules,
    ) -> Self {
        self.cleanup = Some(cleanup);
        self
    }

    /// Decode one id row into a string.
    ///
    /// ## Arguments
    /// * `ids` - The token ids to decode.
    ///
    /// ## Returns
    /// The decoded string; per-id anomalies are recovered locally.
    pub fn decode(
        &self,
        ids: &[T],
    ) -> String {
        let mut pieces: Vec<&[u8]> = Vec::with_capacity(ids.len());

        for &id in ids {
            if self.skip_special_tokens && self.specials.is_special(id) {
                continue;
            }
            match self.vocab.lookup_bytes(id) {
                Some(bytes) => pieces.push(bytes),
                None => match self.unknown {
                    DecodeUnknown::Replace => pieces.push("\u{FFFD}".as_bytes()),
                    DecodeUnknown::Drop => {
                        log::warn!("dropping out-of-range token id {id}");
                    }
                },
            }
        }

        let text = self.join_pieces(&pieces);
        match &self.cleanup {
            Some(rules) => rules.apply(&text),
            None => text,
        }
    }

    fn join_pieces(
        &self,
        pieces: &[&[u8]],
    ) -> String {
        match &self.joiner {
            PieceJoiner::Plain => {
                let bytes: Vec<u8> = pieces.concat();
                String::from_utf8_lossy(&bytes).into_owned()
            }
            PieceJoiner::ByteLevel(table) => {
                let remapped: String = pieces
                    .iter()
                    .map(|p| String::from_utf8_lossy(p))
                    .collect();
                table.decode_lossy(&remapped)
            }
            PieceJoiner::Continuation(marker) => {
                let mut out = String::new();
                for piece in pieces {
                    let piece = String::from_utf8_lossy(piece);
                    match piece.strip_prefix(marker.as_str()) {
                        Some(stripped) => out.push_str(stripped),
                        None => {
                            if !out.is_empty() {
                                out.push(' ');
                            }
                            out.push_str(&piece);
                        }
                    }
                }
                out
            }
            PieceJoiner::WordPrefix(prefix) => {
                let joined: String = pieces
                    .iter()
                    .map(|p| String::from_utf8_lossy(p))
                    .collect();
                let spaced = joined.replace(prefix.as_str(), " ");
                spaced.strip_prefix(' ').unwrap_or(&spaced).to_string()
            }
        }
    }

    /// Decode every row of a ragged batch.
    pub fn decode_batch(
        &self,
        batch: &RaggedBatch<T>,
    ) -> Vec<String> {
        batch.rows().map(|row| self.decode(row)).collect()
    }

    /// Decode a padded tensor, dropping padding columns via the mask.
    pub fn decode_padded(
        &self,
        padded: &PaddedBatch<T>,
    ) -> Vec<String> {
        self.decode_batch(&padded.unpad())
    }
}
