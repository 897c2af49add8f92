//! # Byte-Sequence Rank Table

use crate::errors::{TlResult, TokenloomError};
use crate::types::{TlHashMap, TokenType};

/// The explicit byte-sequence rank table of a rank-table tokenizer.
///
/// Maps byte sequences directly to ids; merge priority is the id value
/// itself. The table must cover every single byte value, which is what
/// guarantees the merge loop always resolves without an unk fallback.
#[derive(Debug, Clone)]
pub struct RankVocab<T: TokenType> {
    /// ``{ Vec<u8> -> T }``; the id doubles as the merge rank.
    ranks: TlHashMap<Vec<u8>, T>,

    /// The pre-segmentation pattern this table was trained against.
    pattern: String,
}

impl<T: TokenType> RankVocab<T> {
    /// Build a rank table from `(bytes, id)` pairs.
    ///
    /// ## Arguments
    /// * `pairs` - An iterator of byte-sequence / id pairs.
    /// * `pattern` - The pre-segmentation regex pattern.
    ///
    /// ## Returns
    /// A `TlResult<RankVocab>`; duplicates and missing single-byte
    /// coverage are construction errors.
    pub fn try_from_pairs<I, S, P>(
        pairs: I,
        pattern: P,
    ) -> TlResult<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<Vec<u8>>,
        P: Into<String>,
    {
        let mut ranks: TlHashMap<Vec<u8>, T> = TlHashMap::default();
        for (span, token) in pairs {
            let span = span.into();
            if ranks.insert(span.clone(), token).is_some() {
                return Err(TokenloomError::VocabConflict(format!(
                    "rank entry {span:?} defined twice"
                )));
            }
        }

        if ranks.is_empty() {
            return Err(TokenloomError::EmptyVocab);
        }

        for byte in 0..=255_u8 {
            if !ranks.contains_key(&[byte][..]) {
                return Err(TokenloomError::IncompleteByteCoverage { byte });
            }
        }

        log::debug!("built rank table: {} entries", ranks.len());
        Ok(Self {
            ranks,
            pattern: pattern.into(),
        })
    }

    /// The number of rank entries.
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// The pre-segmentation pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Look up the id/rank for a byte sequence.
    pub fn lookup(
        &self,
        span: &[u8],
    ) -> Option<T> {
        self.ranks.get(span).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type T = u32;

    /// All 256 single bytes at their own value, plus some pairs.
    fn small_rank_table() -> RankVocab<T> {
        let mut pairs: Vec<(Vec<u8>, T)> = (0..=255_u8).map(|b| (vec![b], b as T)).collect();
        pairs.push((b"th".to_vec(), 256));
        pairs.push((b"the".to_vec(), 257));
        RankVocab::try_from_pairs(pairs, r"\w+|\s+").unwrap()
    }

    #[test]
    fn test_lookup() {
        let vocab = small_rank_table();

        assert_eq!(vocab.len(), 258);
        assert_eq!(vocab.pattern(), r"\w+|\s+");
        assert_eq!(vocab.lookup(b"t"), Some(b't' as T));
        assert_eq!(vocab.lookup(b"th"), Some(256));
        assert_eq!(vocab.lookup(b"xyz"), None);
    }

    #[test]
    fn test_byte_coverage_is_required() {
        // Missing byte 0x00 .. everything except 'a'.
        let result = RankVocab::<T>::try_from_pairs([(b"a".to_vec(), 0)], "");
        assert!(matches!(
            result,
            Err(TokenloomError::IncompleteByteCoverage { .. }),
        ));
    }
}
