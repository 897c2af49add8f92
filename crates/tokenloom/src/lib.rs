//! # `tokenloom` Tokenizer Pipeline Compiler
//!
//! `tokenloom` turns a text tokenizer's *declarative definition*
//! (vocabulary, merge rules, normalization rules, special-token
//! templates) into a composable pipeline of pure, batch-parallel
//! string/tensor operations that reproduces the behavior of the
//! reference tokenizer token-for-token, without depending on that
//! reference at run time.
//!
//! See:
//! * [`ragged`] for the flat-buffer + offsets batch substrate.
//! * [`normalize`] for normalization, splitting, and byte remapping.
//! * [`vocab`] for the immutable definition tables.
//! * [`encoders`] for the five subword algorithms.
//! * [`template`] for special-token assembly.
//! * [`decoders`] to decode tokens into text.
//! * [`pipeline`] to compose and drive the stages.
//!
//! ## Crate Features
//!
//! #### feature: ``default``
//!
//! * ``ahash``
//! * ``rayon``
//!
//! #### feature: ``ahash``
//!
//! This swaps all `HashMap`/`HashSet` implementations for ``ahash``; which
//! is a performance win on many/(most?) modern CPUs.
//!
//! This is done by the ``types::TlHash{*}`` type alias machinery.
//!
//! #### feature: ``rayon``
//!
//! This enables batch-level parallelism wrappers using the ``rayon``
//! crate. Rows share only read-only definition tables, so batch
//! execution distributes with no locking.
//!
//! ## Building a Pipeline
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use tokenloom::encoders::{BpeEncoder, EncoderKind};
//! use tokenloom::pipeline::{PipelineConfig, TokenizerPipeline};
//! use tokenloom::rayon::ParallelTokenizer;
//! use tokenloom::vocab::{MergeVocab, SpecialVocab, TokenVocab};
//!
//! type T = u32;
//!
//! let vocab: Arc<TokenVocab<T>> = Arc::new(TokenVocab::try_from_str_pairs(entries)?);
//! let merges = MergeVocab::try_new(merge_pairs, &vocab)?;
//! let specials = SpecialVocab::default().with_unk("<unk>", 0);
//!
//! let encoder = BpeEncoder::try_new(vocab, merges, None, &specials)?;
//! let pipeline = TokenizerPipeline::try_new(
//!     EncoderKind::Bpe(encoder),
//!     specials,
//!     None,
//!     None,
//!     PipelineConfig::default(),
//! )?;
//! let pipeline = ParallelTokenizer::new(pipeline);
//!
//! let tensors = pipeline.encode_batch(&["hello world"])?;
//! ```
#![warn(missing_docs, unused)]

#[cfg(feature = "rayon")]
pub mod rayon;

pub mod decoders;
pub mod encoders;
pub mod errors;
pub mod normalize;
pub mod pipeline;
pub mod ragged;
pub mod template;
pub mod types;
pub mod vocab;
