//! # Byte-Pair Merge Encoder
//!
//! Repeatedly merges the adjacent symbol pair with the lowest rank
//! until no mergeable pair remains; ties go to the leftmost occurrence.

use std::sync::Arc;

use crate::encoders::{EncodeScratch, SpanEncoder};
use crate::errors::TlResult;
use crate::normalize::ByteLevel;
use crate::types::TokenType;
use crate::vocab::{MergeVocab, SpecialVocab, TokenVocab};

/// A [`SpanEncoder`] applying learned byte-pair merges.
///
/// Symbols start as single codepoints, or as byte-remapped bytes when a
/// byte-level table is attached. Final symbols missing from the
/// vocabulary fall back to unk, or are byte-decomposed when byte-level.
#[derive(Debug, Clone)]
pub struct BpeEncoder<T: TokenType> {
    vocab: Arc<TokenVocab<T>>,
    merges: MergeVocab,
    byte_level: Option<Arc<ByteLevel>>,
    unk: Option<T>,
}

impl<T: TokenType> BpeEncoder<T> {
    /// Build a BPE encoder.
    ///
    /// ## Arguments
    /// * `vocab` - The token vocabulary.
    /// * `merges` - The ordered merge table.
    /// * `byte_level` - The byte remapping table, when the model is
    ///   byte-level.
    /// * `specials` - Special slots; without a byte-level table the unk
    ///   slot is required, since unknown symbols have no byte fallback.
    ///
    /// ## Returns
    /// A `TlResult<BpeEncoder>`.
    pub fn try_new(
        vocab: Arc<TokenVocab<T>>,
        merges: MergeVocab,
        byte_level: Option<Arc<ByteLevel>>,
        specials: &SpecialVocab<T>,
    ) -> TlResult<Self> {
        let unk = if byte_level.is_some() {
            specials.unk()
        } else {
            Some(specials.require_unk()?)
        };

        Ok(Self {
            vocab,
            merges,
            byte_level,
            unk,
        })
    }

    /// The attached token vocabulary.
    pub fn vocab(&self) -> &Arc<TokenVocab<T>> {
        &self.vocab
    }

    /// Whether a byte remapping table is attached.
    pub fn is_byte_level(&self) -> bool {
        self.byte_level.is_some()
    }

    /// Run the merge loop over the symbol buffer in place.
    fn merge_symbols(
        &self,
        syms: &mut Vec<String>,
    ) {
        while syms.len() >= 2 {
            // Lowest rank wins; strict `<` keeps the leftmost on ties.
            let mut best: Option<(usize, usize)> = None;
            for i in 0..syms.len() - 1 {
                if let Some(rank) = self.merges.lookup_rank(&syms[i], &syms[i + 1])
                    && best.is_none_or(|(r, _)| rank < r)
                {
                    best = Some((rank, i));
                }
            }

            match best {
                None => break,
                Some((_, i)) => {
                    let right = syms.remove(i + 1);
                    syms[i].push_str(&right);
                }
            }
        }
    }

    /// Look up one final symbol, with unk / byte-decomposition fallback.
    fn append_symbol(
        &self,
        sym: &str,
        tokens: &mut Vec<T>,
    ) {
        if let Some(t) = self.vocab.lookup_str(sym) {
            tokens.push(t);
            return;
        }

        if self.byte_level.is_some() {
            // Every symbol char is a remapped byte with its own entry.
            let mut buf = [0_u8; 4];
            for ch in sym.chars() {
                match self.vocab.lookup_str(ch.encode_utf8(&mut buf)) {
                    Some(t) => tokens.push(t),
                    None => {
                        if let Some(unk) = self.unk {
                            tokens.push(unk);
                        }
                    }
                }
            }
        } else if let Some(unk) = self.unk {
            tokens.push(unk);
        }
    }
}

impl<T: TokenType> SpanEncoder<T> for BpeEncoder<T> {
    fn encode_append(
        &self,
        span: &str,
        tokens: &mut Vec<T>,
        scratch: &mut EncodeScratch<T>,
    ) {
        if span.is_empty() {
            return;
        }
        if let Some(ids) = scratch.memo.get(span) {
            tokens.extend_from_slice(ids);
            return;
        }
        let start = tokens.len();

        let mut syms: Vec<String> = match &self.byte_level {
            Some(table) => span
                .bytes()
                .map(|b| table.encode_byte(b).to_string())
                .collect(),
            None => span.chars().map(String::from).collect(),
        };

        self.merge_symbols(&mut syms);
        for sym in &syms {
            self.append_symbol(sym, tokens);
        }

        scratch
            .memo
            .insert(span.to_string(), tokens[start..].to_vec());
    }
}
