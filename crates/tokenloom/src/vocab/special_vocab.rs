//! # Special Token Slots

use crate::errors::{TlResult, TokenloomError};
use crate::types::{TlHashMap, TlHashSet, TokenType};

/// Named special-token slots plus the literal-string map.
///
/// Not every tokenizer defines every slot; absent slots are `None`, and
/// a template that needs an absent slot fails at construction via the
/// `require_*` accessors. The literal map lets segmentation protect
/// special strings appearing verbatim in input text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecialVocab<T: TokenType> {
    unk: Option<T>,
    bos: Option<T>,
    eos: Option<T>,
    pad: Option<T>,
    cls: Option<T>,
    sep: Option<T>,
    mask: Option<T>,

    /// ``{ literal bytes -> T }`` over every registered special.
    span_map: TlHashMap<Vec<u8>, T>,

    /// Every registered special id.
    tokens: TlHashSet<T>,
}

macro_rules! special_slot {
    ($slot:ident, $with:ident, $require:ident) => {
        /// Get the slot id, if defined.
        pub fn $slot(&self) -> Option<T> {
            self.$slot
        }

        /// Set the slot from a literal string and id.
        pub fn $with(
            mut self,
            word: &str,
            token: T,
        ) -> Self {
            self.$slot = Some(token);
            self.register(word, token);
            self
        }

        /// Get the slot id, or a fatal construction error when absent.
        pub fn $require(&self) -> TlResult<T> {
            self.$slot.ok_or(TokenloomError::MissingSpecial {
                slot: stringify!($slot),
            })
        }
    };
}

impl<T: TokenType> SpecialVocab<T> {
    special_slot!(unk, with_unk, require_unk);
    special_slot!(bos, with_bos, require_bos);
    special_slot!(eos, with_eos, require_eos);
    special_slot!(pad, with_pad, require_pad);
    special_slot!(cls, with_cls, require_cls);
    special_slot!(sep, with_sep, require_sep);
    special_slot!(mask, with_mask, require_mask);

    /// Register an additional special word outside the named slots.
    pub fn with_extra_word(
        mut self,
        word: &str,
        token: T,
    ) -> Self {
        self.register(word, token);
        self
    }

    fn register(
        &mut self,
        word: &str,
        token: T,
    ) {
        self.span_map.insert(word.as_bytes().to_vec(), token);
        self.tokens.insert(token);
    }

    /// The number of registered special words.
    pub fn len(&self) -> usize {
        self.span_map.len()
    }

    /// Check if no specials are registered.
    pub fn is_empty(&self) -> bool {
        self.span_map.is_empty()
    }

    /// Check whether an id is one of the registered specials.
    pub fn is_special(
        &self,
        token: T,
    ) -> bool {
        self.tokens.contains(&token)
    }

    /// Return the associated id for a literal special string, if any.
    pub fn lookup_token(
        &self,
        span: &[u8],
    ) -> Option<T> {
        self.span_map.get(span).copied()
    }

    /// Get the regex pattern matching any registered special literal.
    ///
    /// Longer literals sort first so overlapping specials match longest.
    ///
    /// ## Returns
    /// `None` if no special words are present;
    /// and `Some(String)` otherwise.
    pub fn special_pattern(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let mut literals = self
            .span_map
            .keys()
            .map(|k| String::from_utf8_lossy(k).into_owned())
            .collect::<Vec<_>>();
        literals.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        Some(
            literals
                .iter()
                .map(|l| regex::escape(l))
                .collect::<Vec<_>>()
                .join("|"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type T = u32;

    #[test]
    fn test_slots() {
        let vocab = SpecialVocab::<T>::default()
            .with_unk("[UNK]", 100)
            .with_cls("[CLS]", 101)
            .with_sep("[SEP]", 102);

        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.unk(), Some(100));
        assert_eq!(vocab.cls(), Some(101));
        assert_eq!(vocab.pad(), None);

        assert_eq!(vocab.require_sep().unwrap(), 102);
        assert!(matches!(
            vocab.require_pad(),
            Err(TokenloomError::MissingSpecial { slot: "pad" }),
        ));

        assert!(vocab.is_special(101));
        assert!(!vocab.is_special(7));
        assert_eq!(vocab.lookup_token(b"[CLS]"), Some(101));
    }

    #[test]
    fn test_special_pattern() {
        assert_eq!(SpecialVocab::<T>::default().special_pattern(), None);

        let vocab = SpecialVocab::<T>::default()
            .with_bos("<s>", 1)
            .with_extra_word("<s>x", 2);

        // Longest literal first.
        assert_eq!(vocab.special_pattern().unwrap(), "<s>x|<s>");
    }
}
