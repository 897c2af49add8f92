//! # Ragged Tensor Substrate
//!
//! Batches of variable-length sequences stored as one flat buffer plus
//! row-delimiting offsets. Every pipeline stage consumes a [`RaggedBatch`]
//! and allocates a new one as output; nothing is mutated in place across
//! stage boundaries.

mod padded_batch;
mod ragged_batch;

#[doc(inline)]
pub use padded_batch::*;
#[doc(inline)]
pub use ragged_batch::*;
