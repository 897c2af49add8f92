//! # Vocabulary
//!
//! Immutable definition tables built once at pipeline construction and
//! shared read-only by every batch invocation:
//!
//! * [`TokenVocab`] - the token bytes <-> id bijection.
//! * [`MergeVocab`] - the ordered merge-rank table for BPE models.
//! * [`ScoredVocab`] - per-token log-probabilities for Unigram models.
//! * [`RankVocab`] - the explicit byte-sequence rank table for
//!   rank-table tokenizers, plus their pre-segmentation pattern.
//! * [`TrieVocab`] - the prefix tree for greedy longest-match models.
//! * [`SpecialVocab`] - named special-token slots.

mod merge_vocab;
mod rank_vocab;
mod scored_vocab;
mod special_vocab;
mod token_vocab;
mod trie_vocab;

#[doc(inline)]
pub use merge_vocab::*;
#[doc(inline)]
pub use rank_vocab::*;
#[doc(inline)]
pub use scored_vocab::*;
#[doc(inline)]
pub use special_vocab::*;
#[doc(inline)]
pub use token_vocab::*;
#[doc(inline)]
pub use trie_vocab::*;
