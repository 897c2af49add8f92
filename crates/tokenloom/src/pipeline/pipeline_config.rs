//! # Pipeline Configuration
//!
//! ## Style Hints
//!
//! Instance names should prefer `pipeline_config`,
//! or `config` when there is no ambiguity.

use crate::errors::{TlResult, TokenloomError};
use crate::ragged::{PaddingSpec, Side};

/// Immutable configuration fixed at pipeline construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    add_special_tokens: bool,
    max_length: Option<usize>,
    truncation_side: Side,
    padding_side: Side,
    pad_to_max: bool,
    skip_special_tokens: bool,
    clean_up_tokenization_spaces: bool,
    byte_level: bool,
    lowercase: bool,
    strip_accents: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            add_special_tokens: true,
            max_length: None,
            truncation_side: Side::Right,
            padding_side: Side::Right,
            pad_to_max: false,
            skip_special_tokens: false,
            clean_up_tokenization_spaces: false,
            byte_level: false,
            lowercase: false,
            strip_accents: false,
        }
    }
}

macro_rules! config_flag {
    ($field:ident, $with:ident, $ty:ty) => {
        /// Get the option value.
        pub fn $field(&self) -> $ty {
            self.$field
        }

        /// Set the option value.
        pub fn $with(
            self,
            $field: $ty,
        ) -> Self {
            Self { $field, ..self }
        }
    };
}

impl PipelineConfig {
    config_flag!(add_special_tokens, with_add_special_tokens, bool);
    config_flag!(max_length, with_max_length, Option<usize>);
    config_flag!(truncation_side, with_truncation_side, Side);
    config_flag!(padding_side, with_padding_side, Side);
    config_flag!(pad_to_max, with_pad_to_max, bool);
    config_flag!(skip_special_tokens, with_skip_special_tokens, bool);
    config_flag!(
        clean_up_tokenization_spaces,
        with_clean_up_tokenization_spaces,
        bool
    );
    config_flag!(byte_level, with_byte_level, bool);
    config_flag!(lowercase, with_lowercase, bool);
    config_flag!(strip_accents, with_strip_accents, bool);

    /// The padding/truncation policy this config implies.
    pub fn padding_spec(&self) -> PaddingSpec {
        PaddingSpec {
            max_length: self.max_length,
            pad_to_max: self.pad_to_max,
            truncation_side: self.truncation_side,
            padding_side: self.padding_side,
        }
    }

    /// Validate the configuration.
    ///
    /// ## Returns
    /// A `TlResult<()>`; conflicting options are fatal at construction,
    /// never a silent fallback.
    pub fn validate(&self) -> TlResult<()> {
        if self.pad_to_max && self.max_length.is_none() {
            return Err(TokenloomError::ConfigConflict(
                "pad_to_max requires max_length".into(),
            ));
        }
        if self.max_length == Some(0) {
            return Err(TokenloomError::ConfigConflict(
                "max_length must be nonzero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_flags() {
        let config = PipelineConfig::default()
            .with_lowercase(true)
            .with_max_length(Some(16))
            .with_padding_side(Side::Left);

        assert!(config.lowercase());
        assert!(!config.strip_accents());
        assert_eq!(config.max_length(), Some(16));
        assert_eq!(config.padding_side(), Side::Left);
        assert_eq!(config.truncation_side(), Side::Right);

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_conflicts_are_fatal() {
        assert!(
            PipelineConfig::default()
                .with_pad_to_max(true)
                .validate()
                .is_err()
        );
        assert!(
            PipelineConfig::default()
                .with_max_length(Some(0))
                .validate()
                .is_err()
        );
    }
}
