//! # Ordered Merge-Rank Table

use crate::errors::{TlResult, TokenloomError};
use crate::types::{TlHashMap, TokenType};
use crate::vocab::TokenVocab;

/// The ordered merge table of a BPE model.
///
/// Maps an adjacent symbol pair to its merge rank; lower rank means
/// earlier-learned, applied first. The merged symbol is the
/// concatenation of the pair.
#[derive(Debug, Clone, Default)]
pub struct MergeVocab {
    /// ``{ (left, right) -> rank }``; rank is the definition order.
    ranks: TlHashMap<(String, String), usize>,
}

impl MergeVocab {
    /// Build a merge table from ordered `(left, right)` pairs.
    ///
    /// ## Arguments
    /// * `merges` - Merge pairs in learn order; position defines rank.
    /// * `vocab` - The token vocabulary the merges must resolve against.
    ///
    /// ## Returns
    /// A `TlResult<MergeVocab>`; a pair whose sides or concatenation are
    /// not vocabulary entries indicates a broken definition and is a
    /// construction error.
    pub fn try_new<T, I, S>(
        merges: I,
        vocab: &TokenVocab<T>,
    ) -> TlResult<Self>
    where
        T: TokenType,
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut ranks = TlHashMap::default();

        for (rank, (left, right)) in merges.into_iter().enumerate() {
            let (left, right) = (left.into(), right.into());

            if !vocab.contains_span(left.as_bytes()) || !vocab.contains_span(right.as_bytes()) {
                return Err(TokenloomError::UnknownMergeSymbol { left, right });
            }

            let merged = format!("{left}{right}");
            if !vocab.contains_span(merged.as_bytes()) {
                return Err(TokenloomError::VocabConflict(format!(
                    "merge product {merged:?} missing from vocabulary"
                )));
            }

            ranks.insert((left, right), rank);
        }

        log::debug!("built merge table: {} pairs", ranks.len());
        Ok(Self { ranks })
    }

    /// The number of merge rules.
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Check if the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Look up the rank of an adjacent symbol pair.
    pub fn lookup_rank(
        &self,
        left: &str,
        right: &str,
    ) -> Option<usize> {
        self.ranks
            .get(&(left.to_string(), right.to_string()))
            .copied()
    }
}
