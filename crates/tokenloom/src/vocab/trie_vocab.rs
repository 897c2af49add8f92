//! # Byte Prefix Tree

use crate::errors::{TlResult, TokenloomError};
use crate::types::{TlHashMap, TokenType};

/// One node of the prefix tree, held in the arena.
#[derive(Debug, Clone, Default)]
struct TrieNode<T> {
    /// Child node indices by next byte.
    children: TlHashMap<u8, usize>,

    /// The id of the entry ending at this node, if any.
    token: Option<T>,
}

/// A prefix tree over token byte sequences.
///
/// Nodes live in a flat arena and reference each other by index; the
/// tree is built once at construction and only walked afterwards.
#[derive(Debug, Clone)]
pub struct TrieVocab<T: TokenType> {
    nodes: Vec<TrieNode<T>>,
    len: usize,
}

impl<T: TokenType> TrieVocab<T> {
    /// Build a prefix tree from `(bytes, id)` pairs.
    ///
    /// ## Arguments
    /// * `pairs` - An iterator of byte-span / token-id pairs.
    ///
    /// ## Returns
    /// A `TlResult<TrieVocab>`; empty definitions and duplicate spans
    /// are construction errors.
    pub fn try_from_pairs<I, S>(pairs: I) -> TlResult<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<Vec<u8>>,
    {
        let mut trie = Self {
            nodes: vec![TrieNode::default()],
            len: 0,
        };

        for (span, token) in pairs {
            let span = span.into();
            trie.insert(&span, token)?;
        }

        if trie.len == 0 {
            return Err(TokenloomError::EmptyVocab);
        }

        log::debug!(
            "built trie vocab: {} entries, {} nodes",
            trie.len,
            trie.nodes.len()
        );
        Ok(trie)
    }

    fn insert(
        &mut self,
        span: &[u8],
        token: T,
    ) -> TlResult<()> {
        let mut node = 0;
        for &byte in span {
            node = match self.nodes[node].children.get(&byte).copied() {
                Some(next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[node].children.insert(byte, next);
                    next
                }
            };
        }

        if self.nodes[node].token.replace(token).is_some() {
            return Err(TokenloomError::VocabConflict(format!(
                "trie entry {span:?} defined twice"
            )));
        }
        self.len += 1;
        Ok(())
    }

    /// The number of entries in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Find the longest entry that is a prefix of `bytes`.
    ///
    /// ## Arguments
    /// * `bytes` - The byte sequence to match against.
    ///
    /// ## Returns
    /// `Some((consumed_len, id))` for the longest matching prefix,
    /// `None` when no entry matches at this position.
    pub fn longest_match(
        &self,
        bytes: &[u8],
    ) -> Option<(usize, T)> {
        let mut node = 0;
        let mut best = None;

        for (depth, byte) in bytes.iter().enumerate() {
            match self.nodes[node].children.get(byte) {
                Some(&next) => node = next,
                None => break,
            }
            if let Some(token) = self.nodes[node].token {
                best = Some((depth + 1, token));
            }
        }
        best
    }
}
