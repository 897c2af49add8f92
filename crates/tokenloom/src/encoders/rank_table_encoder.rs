//! # Explicit Rank-Table Merge Encoder
//!
//! The same merge loop as BPE, but pair priority is looked up directly
//! in a byte-sequence rank table rather than a learned merge list.

use std::sync::Arc;

use crate::encoders::{EncodeScratch, SpanEncoder};
use crate::types::TokenType;
use crate::vocab::RankVocab;

/// A [`SpanEncoder`] merging byte ranges against an explicit rank table.
///
/// The table covers every single byte, so every span resolves without
/// an unk fallback; pieces only ever merge into other table entries.
#[derive(Debug, Clone)]
pub struct RankTableEncoder<T: TokenType> {
    ranks: Arc<RankVocab<T>>,
}

impl<T: TokenType> RankTableEncoder<T> {
    /// Build a rank-table encoder.
    ///
    /// ## Arguments
    /// * `ranks` - The byte-sequence rank table.
    pub fn new(ranks: Arc<RankVocab<T>>) -> Self {
        Self { ranks }
    }

    /// The attached rank table.
    pub fn rank_vocab(&self) -> &Arc<RankVocab<T>> {
        &self.ranks
    }
}

impl<T: TokenType> SpanEncoder<T> for RankTableEncoder<T> {
    fn encode_append(
        &self,
        span: &str,
        tokens: &mut Vec<T>,
        _scratch: &mut EncodeScratch<T>,
    ) {
        let bytes = span.as_bytes();
        if bytes.is_empty() {
            return;
        }

        // Working memory: byte ranges of the current pieces.
        let mut pieces: Vec<(usize, usize)> = (0..bytes.len()).map(|i| (i, i + 1)).collect();

        while pieces.len() >= 2 {
            // Lowest rank wins; strict `<` keeps the leftmost on ties.
            let mut best: Option<(T, usize)> = None;
            for i in 0..pieces.len() - 1 {
                let cat = &bytes[pieces[i].0..pieces[i + 1].1];
                if let Some(rank) = self.ranks.lookup(cat)
                    && best.is_none_or(|(r, _)| rank < r)
                {
                    best = Some((rank, i));
                }
            }

            match best {
                None => break,
                Some((_, i)) => {
                    pieces[i].1 = pieces[i + 1].1;
                    pieces.remove(i + 1);
                }
            }
        }

        for &(start, end) in &pieces {
            tokens.push(self.ranks.lookup(&bytes[start..end]).unwrap());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type T = u32;

    fn small_encoder() -> RankTableEncoder<T> {
        let mut pairs: Vec<(Vec<u8>, T)> = (0..=255_u8).map(|b| (vec![b], b as T)).collect();
        pairs.push((b"th".to_vec(), 256));
        pairs.push((b"he".to_vec(), 257));
        pairs.push((b"the".to_vec(), 258));

        RankTableEncoder::new(Arc::new(
            RankVocab::try_from_pairs(pairs, r"\w+|\s+").unwrap(),
        ))
    }

    #[test]
    fn test_rank_priority_merging() {
        let encoder = small_encoder();

        // Both ("t","h") and ("h","e") are available in "the"; "th" at
        // rank 256 merges first, then ("th","e") lands on 258.
        assert_eq!(encoder.encode_span("the"), vec![258]);
        assert_eq!(encoder.encode_span("he"), vec![257]);
    }

    #[test]
    fn test_uncovered_text_falls_to_bytes() {
        let encoder = small_encoder();

        assert_eq!(
            encoder.encode_span("cat"),
            vec![b'c' as T, b'a' as T, b't' as T],
        );
        assert_eq!(encoder.encode_span(""), Vec::<T>::new());
    }

    #[test]
    fn test_multibyte_input_resolves() {
        let encoder = small_encoder();

        // No table entry beyond single bytes for UTF-8 continuation
        // bytes; every byte still resolves.
        assert_eq!(encoder.encode_span("é").len(), 2);
    }
}
