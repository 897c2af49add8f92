//! # Token Decoders
//!
//! Id -> token lookup, special-token filtering, reversal of the
//! continuation / byte-level conventions, and artifact cleanup.

mod cleanup;
mod token_decoder;

#[doc(inline)]
pub use cleanup::*;
#[doc(inline)]
pub use token_decoder::*;
