//! # Error Types
//!
//! Only definition and configuration problems surface to the caller;
//! per-row anomalies (vocabulary misses, out-of-range ids, bad bytes)
//! are recovered locally inside the stage that hit them.

/// Errors from tokenloom pipeline construction and invocation.
#[derive(Debug, thiserror::Error)]
pub enum TokenloomError {
    /// The vocabulary definition contains no entries.
    #[error("empty vocabulary")]
    EmptyVocab,

    /// Vocabulary data is inconsistent.
    #[error("vocab conflict: {0}")]
    VocabConflict(String),

    /// A rank table does not cover every single byte value.
    #[error("rank table missing single-byte entry for {byte:#04x}")]
    IncompleteByteCoverage {
        /// The first uncovered byte value.
        byte: u8,
    },

    /// A merge rule references a symbol missing from the vocabulary.
    #[error("merge rule ({left:?}, {right:?}) references unknown symbol")]
    UnknownMergeSymbol {
        /// Left side of the merge pair.
        left: String,
        /// Right side of the merge pair.
        right: String,
    },

    /// A configured template requires a special-token slot that is absent.
    #[error("missing required special token slot: {slot}")]
    MissingSpecial {
        /// The slot name (`unk`, `cls`, ...).
        slot: &'static str,
    },

    /// Mutually inconsistent configuration options.
    #[error("configuration conflict: {0}")]
    ConfigConflict(String),

    /// A call shape does not match the configured template.
    #[error("template mismatch: {0}")]
    TemplateMismatch(String),

    /// Ragged offsets are malformed.
    #[error("malformed ragged offsets: {0}")]
    MalformedOffsets(String),

    /// A split pattern failed to compile.
    #[error("invalid split pattern: {0}")]
    BadPattern(String),

    /// The stage list does not form a valid pipeline graph.
    #[error("pipeline graph: {0}")]
    GraphConflict(String),
}

/// Result type for tokenloom operations.
pub type TlResult<T> = core::result::Result<T, TokenloomError>;
