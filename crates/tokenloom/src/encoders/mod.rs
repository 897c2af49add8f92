//! # Subword Encoders
//!
//! Five interchangeable algorithms mapping text spans to token-id
//! sequences. Every encoder is a pure function of the span plus its
//! immutable vocabulary, which is what allows batch-row parallelism;
//! per-invocation working memory lives in [`EncodeScratch`].
//!
//! An encoder never aborts on unknown input: a non-empty span always
//! produces at least one id, via unk fallback or single-unit
//! consumption.

mod bpe_encoder;
mod rank_table_encoder;
mod trie_encoder;
mod unigram_encoder;
mod wordpiece_encoder;

#[doc(inline)]
pub use bpe_encoder::*;
#[doc(inline)]
pub use rank_table_encoder::*;
#[doc(inline)]
pub use trie_encoder::*;
#[doc(inline)]
pub use unigram_encoder::*;
#[doc(inline)]
pub use wordpiece_encoder::*;

use crate::normalize::SplitRule;
use crate::types::{TlHashMap, TokenType};

/// Per-invocation encoder working memory.
///
/// Owned by one batch invocation (one worker) and discarded when the
/// call returns; never shared or retained across invocations.
#[derive(Debug, Default)]
pub struct EncodeScratch<T: TokenType> {
    /// Memo of span string -> encoded ids for repeated words.
    pub(crate) memo: TlHashMap<String, Vec<T>>,
}

impl<T: TokenType> EncodeScratch<T> {
    /// Create empty scratch memory.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A trait for span encoders.
pub trait SpanEncoder<T: TokenType>: Send + Sync {
    /// Encode a span, appending ids to a target buffer.
    ///
    /// ## Arguments
    /// * `span` - The text span to encode.
    /// * `tokens` - The target token buffer to append to.
    /// * `scratch` - Per-invocation working memory.
    fn encode_append(
        &self,
        span: &str,
        tokens: &mut Vec<T>,
        scratch: &mut EncodeScratch<T>,
    );

    /// Encode a span into a fresh buffer.
    ///
    /// ## Arguments
    /// * `span` - The text span to encode.
    ///
    /// ## Returns
    /// A vector of tokens.
    fn encode_span(
        &self,
        span: &str,
    ) -> Vec<T> {
        let mut tokens = Vec::new();
        self.encode_append(span, &mut tokens, &mut EncodeScratch::new());
        tokens
    }
}

/// The closed set of encoder algorithms.
///
/// The legal algorithm set is fixed at design time; each variant
/// carries only the model state it needs.
#[derive(Debug, Clone)]
pub enum EncoderKind<T: TokenType> {
    /// Byte-pair encoding over a learned merge table.
    Bpe(BpeEncoder<T>),

    /// Greedy longest-prefix matching with continuation markers.
    WordPiece(WordPieceEncoder<T>),

    /// Maximum-log-probability Viterbi segmentation.
    Unigram(UnigramEncoder<T>),

    /// Explicit byte-sequence rank-table merging.
    RankTable(RankTableEncoder<T>),

    /// Trie-based greedy longest-match.
    TrieGreedy(TrieEncoder<T>),
}

impl<T: TokenType> EncoderKind<T> {
    /// The split rule this model was trained against, if it carries one.
    ///
    /// Rank-table models ship their own pre-segmentation pattern; the
    /// pipeline builder installs it when no explicit rule is given.
    pub fn preferred_split_rule(&self) -> Option<SplitRule> {
        match self {
            EncoderKind::RankTable(enc) => {
                Some(SplitRule::Pattern(enc.rank_vocab().pattern().to_string()))
            }
            _ => None,
        }
    }

    /// Whether the algorithm operates on byte-remapped symbols.
    pub fn is_byte_level(&self) -> bool {
        match self {
            EncoderKind::Bpe(enc) => enc.is_byte_level(),
            _ => false,
        }
    }
}

impl<T: TokenType> SpanEncoder<T> for EncoderKind<T> {
    fn encode_append(
        &self,
        span: &str,
        tokens: &mut Vec<T>,
        scratch: &mut EncodeScratch<T>,
    ) {
        match self {
            EncoderKind::Bpe(enc) => enc.encode_append(span, tokens, scratch),
            EncoderKind::WordPiece(enc) => enc.encode_append(span, tokens, scratch),
            EncoderKind::Unigram(enc) => enc.encode_append(span, tokens, scratch),
            EncoderKind::RankTable(enc) => enc.encode_append(span, tokens, scratch),
            EncoderKind::TrieGreedy(enc) => enc.encode_append(span, tokens, scratch),
        }
    }
}
