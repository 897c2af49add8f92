//! # Log-Probability Token Table

use crate::errors::{TlResult, TokenloomError};
use crate::types::{TlHashMap, TokenType};

/// The scored vocabulary of a Unigram model.
///
/// Each piece carries its id and a log-probability; the encoder searches
/// for the maximum-total-log-probability segmentation.
#[derive(Debug, Clone)]
pub struct ScoredVocab<T: TokenType> {
    /// ``{ piece -> (id, log_prob) }``
    scores: TlHashMap<String, (T, f64)>,

    /// Longest piece length in chars; bounds the Viterbi inner loop.
    max_piece_chars: usize,
}

impl<T: TokenType> ScoredVocab<T> {
    /// Build a scored vocabulary from `(piece, id, log_prob)` entries.
    ///
    /// ## Arguments
    /// * `entries` - An iterator of piece / id / log-probability triples.
    ///
    /// ## Returns
    /// A `TlResult<ScoredVocab>`; empty definitions, duplicate pieces,
    /// and non-finite scores are construction errors.
    pub fn try_from_entries<I, S>(entries: I) -> TlResult<Self>
    where
        I: IntoIterator<Item = (S, T, f64)>,
        S: Into<String>,
    {
        let mut scores: TlHashMap<String, (T, f64)> = TlHashMap::default();
        let mut max_piece_chars = 0;

        for (piece, token, score) in entries {
            let piece = piece.into();
            if !score.is_finite() {
                return Err(TokenloomError::VocabConflict(format!(
                    "piece {piece:?} has non-finite score {score}"
                )));
            }
            max_piece_chars = max_piece_chars.max(piece.chars().count());
            if scores.insert(piece.clone(), (token, score)).is_some() {
                return Err(TokenloomError::VocabConflict(format!(
                    "piece {piece:?} defined twice"
                )));
            }
        }

        if scores.is_empty() {
            return Err(TokenloomError::EmptyVocab);
        }

        log::debug!("built scored vocab: {} pieces", scores.len());
        Ok(Self {
            scores,
            max_piece_chars,
        })
    }

    /// The number of scored pieces.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Check if the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Longest piece length, in chars.
    pub fn max_piece_chars(&self) -> usize {
        self.max_piece_chars
    }

    /// Look up a piece's id and log-probability.
    pub fn lookup(
        &self,
        piece: &str,
    ) -> Option<(T, f64)> {
        self.scores.get(piece).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type T = u32;

    #[test]
    fn test_lookup() {
        let vocab = ScoredVocab::<T>::try_from_entries([
            ("a", 0, -1.0),
            ("b", 1, -2.0),
            ("ab", 2, -2.5),
        ])
        .unwrap();

        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.max_piece_chars(), 2);
        assert_eq!(vocab.lookup("ab"), Some((2, -2.5)));
        assert_eq!(vocab.lookup("ba"), None);
    }

    #[test]
    fn test_bad_definitions_are_fatal() {
        assert!(ScoredVocab::<T>::try_from_entries([] as [(&str, T, f64); 0]).is_err());
        assert!(ScoredVocab::<T>::try_from_entries([("a", 0, f64::NAN)]).is_err());
        assert!(
            ScoredVocab::<T>::try_from_entries([("a", 0, -1.0), ("a", 1, -2.0)]).is_err()
        );
    }
}
