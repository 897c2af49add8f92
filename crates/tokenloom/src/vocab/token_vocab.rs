//! # Token Bytes <-> Id Bijection

use crate::errors::{TlResult, TokenloomError};
use crate::types::{TlHashMap, TokenType};

/// The token string/byte-span <-> integer id bijection.
///
/// Built once from an external tokenizer definition; read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct TokenVocab<T: TokenType> {
    /// ``{ Vec<u8> -> T }``
    span_to_token: TlHashMap<Vec<u8>, T>,

    /// ``{ T -> Vec<u8> }``
    token_to_span: TlHashMap<T, Vec<u8>>,
}

impl<T: TokenType> TokenVocab<T> {
    /// Build a vocabulary from `(bytes, id)` pairs.
    ///
    /// ## Arguments
    /// * `pairs` - An iterator of byte-span / token-id pairs.
    ///
    /// ## Returns
    /// A `TlResult<TokenVocab>`; an empty definition or any duplicated
    /// span or id (a broken bijection) is a construction error.
    pub fn try_from_pairs<I, S>(pairs: I) -> TlResult<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<Vec<u8>>,
    {
        let mut vocab = Self::default();
        for (span, token) in pairs {
            let span = span.into();
            if let Some(prev) = vocab.token_to_span.insert(token, span.clone()) {
                return Err(TokenloomError::VocabConflict(format!(
                    "token {token} maps to both {prev:?} and {span:?}"
                )));
            }
            if vocab.span_to_token.insert(span.clone(), token).is_some() {
                return Err(TokenloomError::VocabConflict(format!(
                    "span {span:?} defined twice"
                )));
            }
        }

        if vocab.span_to_token.is_empty() {
            return Err(TokenloomError::EmptyVocab);
        }

        log::debug!("built token vocab: {} entries", vocab.len());
        Ok(vocab)
    }

    /// Build a vocabulary from `(str, id)` pairs.
    pub fn try_from_str_pairs<I, S>(pairs: I) -> TlResult<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
    {
        Self::try_from_pairs(
            pairs
                .into_iter()
                .map(|(s, t)| (s.as_ref().as_bytes().to_vec(), t)),
        )
    }

    /// The number of tokens in the vocabulary.
    pub fn len(&self) -> usize {
        self.span_to_token.len()
    }

    /// Check if the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.span_to_token.is_empty()
    }

    /// The largest token id, if any.
    pub fn max_token(&self) -> Option<T> {
        self.token_to_span.keys().max().copied()
    }

    /// Look up the id for a byte span.
    pub fn lookup_token(
        &self,
        span: &[u8],
    ) -> Option<T> {
        self.span_to_token.get(span).copied()
    }

    /// Look up the id for a string.
    pub fn lookup_str(
        &self,
        s: &str,
    ) -> Option<T> {
        self.lookup_token(s.as_bytes())
    }

    /// Look up the byte span for an id.
    pub fn lookup_bytes(
        &self,
        token: T,
    ) -> Option<&[u8]> {
        self.token_to_span.get(&token).map(Vec::as_slice)
    }

    /// Check whether a byte span is a full vocabulary entry.
    pub fn contains_span(
        &self,
        span: &[u8],
    ) -> bool {
        self.span_to_token.contains_key(span)
    }

    /// Iterate over `(span, token)` pairs in arbitrary order.
    pub fn span_pairs(&self) -> impl Iterator<Item = (&[u8], T)> {
        self.span_to_token.iter().map(|(s, &t)| (s.as_slice(), t))
    }
}
