//! # Viterbi Unigram Encoder
//!
//! Finds the maximum-log-probability segmentation of a span into
//! scored pieces; the best-score table is a bounded array indexed by
//! span position, sized per call.

use std::sync::Arc;

use crate::encoders::{EncodeScratch, SpanEncoder};
use crate::errors::TlResult;
use crate::types::TokenType;
use crate::vocab::{ScoredVocab, SpecialVocab};

/// A [`SpanEncoder`] applying Viterbi search over a scored vocabulary.
///
/// Score ties at a boundary prefer the longer candidate piece.
/// Positions no piece can reach fall back to unk; a maximal unmatched
/// run collapses to a single unk.
#[derive(Debug, Clone)]
pub struct UnigramEncoder<T: TokenType> {
    vocab: Arc<ScoredVocab<T>>,
    unk: T,
}

impl<T: TokenType> UnigramEncoder<T> {
    /// Build a Unigram encoder.
    ///
    /// ## Arguments
    /// * `vocab` - The scored vocabulary.
    /// * `specials` - Special slots; the unk slot is required.
    ///
    /// ## Returns
    /// A `TlResult<UnigramEncoder>`.
    pub fn try_new(
        vocab: Arc<ScoredVocab<T>>,
        specials: &SpecialVocab<T>,
    ) -> TlResult<Self> {
        Ok(Self {
            vocab,
            unk: specials.require_unk()?,
        })
    }

    /// The attached scored vocabulary.
    pub fn vocab(&self) -> &Arc<ScoredVocab<T>> {
        &self.vocab
    }
}

impl<T: TokenType> SpanEncoder<T> for UnigramEncoder<T> {
    fn encode_append(
        &self,
        span: &str,
        tokens: &mut Vec<T>,
        _scratch: &mut EncodeScratch<T>,
    ) {
        let chars: Vec<char> = span.chars().collect();
        let n = chars.len();
        if n == 0 {
            return;
        }

        // Heavy per-char penalty for positions no piece reaches, so
        // paths with fewer unknown chars always win.
        const UNK_STEP_SCORE: f64 = -1e4;

        // best[i]: best (score, piece start, is unk step) over
        // segmentations of chars[..i]; sized to the span per call.
        let mut best: Vec<Option<(f64, usize, bool)>> = vec![None; n + 1];
        best[0] = Some((0.0, 0, false));

        let max_piece = self.vocab.max_piece_chars().min(n);

        for end in 1..=n {
            let lo = end.saturating_sub(max_piece);
            // Ascending start order visits longer candidates first, so
            // strict `>` keeps the longer piece on score ties.
            for start in lo..end {
                let Some((prefix_score, _, _)) = best[start] else {
                    continue;
                };
                let piece: String = chars[start..end].iter().collect();
                if let Some((_, score)) = self.vocab.lookup(&piece) {
                    let cand = prefix_score + score;
                    if best[end].is_none_or(|(s, _, _)| cand > s) {
                        best[end] = Some((cand, start, false));
                    }
                }
            }

            if best[end].is_none() {
                // No piece ends here; bridge with a one-char unk step.
                // best[end - 1] is always reachable by induction.
                let (prev, _, _) = best[end - 1].unwrap();
                best[end] = Some((prev + UNK_STEP_SCORE, end - 1, true));
            }
        }

        // Backtrack to recover the winning segmentation.
        let mut pieces: Vec<Option<T>> = Vec::new();
        let mut pos = n;
        while pos > 0 {
            let (_, start, is_unk) = best[pos].unwrap();
            if is_unk {
                pieces.push(None);
            } else {
                let piece: String = chars[start..pos].iter().collect();
                let (id, _) = self.vocab.lookup(&piece).unwrap();
                pieces.push(Some(id));
            }
            pos = start;
        }
        pieces.reverse();

        // Collapse each maximal unmatched run to a single unk.
        let mut last_was_unk = false;
        for piece in pieces {
            match piece {
                Some(id) => {
                    tokens.push(id);
                    last_was_unk = false;
                }
                None => {
                    if !last_was_unk {
                        tokens.push(self.unk);
                        last_was_unk = true;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type T = u32;

    fn scored_encoder(entries: &[(&str, T, f64)]) -> UnigramEncoder<T> {
        let vocab = Arc::new(
            ScoredVocab::try_from_entries(entries.iter().map(|&(s, t, p)| (s, t, p))).unwrap(),
        );
        let specials = SpecialVocab::default().with_unk("<unk>", 99);
        UnigramEncoder::try_new(vocab, &specials).unwrap()
    }

    #[test]
    fn test_best_segmentation_wins() {
        // "ab" as one piece scores -1.5; "a"+"b" scores -3.0.
        let encoder = scored_encoder(&[("a", 0, -1.0), ("b", 1, -2.0), ("ab", 2, -1.5)]);
        assert_eq!(encoder.encode_span("ab"), vec![2]);

        // "ba" has no single piece; falls back to the char pieces.
        assert_eq!(encoder.encode_span("ba"), vec![1, 0]);
    }

    #[test]
    fn test_tie_prefers_longer_piece() {
        // Both "ab" and "a"+"b" total -2.0; the longer piece wins.
        let encoder = scored_encoder(&[("a", 0, -1.0), ("b", 1, -1.0), ("ab", 2, -2.0)]);
        assert_eq!(encoder.encode_span("ab"), vec![2]);
    }

    #[test]
    fn test_unmatched_run_collapses_to_unk() {
        let encoder = scored_encoder(&[("a", 0, -1.0)]);

        assert_eq!(encoder.encode_span("xyz"), vec![99]);
        assert_eq!(encoder.encode_span("axya"), vec![0, 99, 0]);
        assert_eq!(encoder.encode_span(""), Vec::<T>::new());
    }
}
