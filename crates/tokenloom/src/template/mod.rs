//! # Template Assembly
//!
//! Special-token insertion, sequence-pair combination, and the
//! truncation budget that applies *before* insertion.

mod assembler;

#[doc(inline)]
pub use assembler::*;
