//! # Batch Pipeline Drivers
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use tokenloom::encoders::{EncoderKind, WordPieceEncoder};
//! use tokenloom::pipeline::{PipelineConfig, TokenizerPipeline};
//! use tokenloom::template::Template;
//! use tokenloom::vocab::{SpecialVocab, TokenVocab};
//!
//! fn example(
//!     vocab: Arc<TokenVocab<u32>>,
//!     specials: SpecialVocab<u32>,
//! ) -> tokenloom::errors::TlResult<()> {
//!     let encoder = WordPieceEncoder::try_new(vocab, "##", &specials)?;
//!     let template = Template::classifier(&specials)?;
//!
//!     let pipeline = TokenizerPipeline::try_new(
//!         EncoderKind::WordPiece(encoder),
//!         specials,
//!         Some(template),
//!         None,
//!         PipelineConfig::default().with_max_length(Some(16)),
//!     )?;
//!
//!     let tensors = pipeline.encode_batch(&["hello world"])?;
//!     let _ = tensors.attention_mask();
//!     Ok(())
//! }
//! ```

use crate::encoders::{EncodeScratch, EncoderKind, SpanEncoder};
use crate::errors::{TlResult, TokenloomError};
use crate::normalize::{Normalizer, Span, SplitRule, Splitter};
use crate::pipeline::{PipelineConfig, PipelineGraph, StageDesc};
use crate::ragged::{PaddedBatch, RaggedBatch};
use crate::template::{Template, TemplateAssembler};
use crate::types::TokenType;
use crate::vocab::SpecialVocab;

/// The named output tensors of the tokenize direction.
#[derive(Debug, Clone)]
pub struct EncodedTensors<T: TokenType> {
    /// `input_ids` and `attention_mask`, shape `[N, L]`.
    ids: PaddedBatch<T>,

    /// `token_type_ids`, shape `[N, L]`; pair templates only.
    type_ids: Option<PaddedBatch<u8>>,
}

impl<T: TokenType> EncodedTensors<T> {
    /// Assemble from already-padded parts.
    pub(crate) fn from_parts(
        ids: PaddedBatch<T>,
        type_ids: Option<PaddedBatch<u8>>,
    ) -> Self {
        Self { ids, type_ids }
    }

    /// The number of rows `N`.
    pub fn num_rows(&self) -> usize {
        self.ids.num_rows()
    }

    /// The common row length `L`.
    pub fn num_cols(&self) -> usize {
        self.ids.num_cols()
    }

    /// Row-major `[N, L]` token ids.
    pub fn input_ids(&self) -> &[T] {
        self.ids.input_ids()
    }

    /// Row-major `[N, L]` 1/0 attention mask.
    pub fn attention_mask(&self) -> &[u8] {
        self.ids.attention_mask()
    }

    /// Row-major `[N, L]` token type ids, when a pair template ran.
    pub fn token_type_ids(&self) -> Option<&[u8]> {
        self.type_ids.as_ref().map(PaddedBatch::input_ids)
    }

    /// The underlying padded id batch.
    pub fn padded(&self) -> &PaddedBatch<T> {
        &self.ids
    }
}

/// The tokenize-direction pipeline.
///
/// Sequences normalization, segmentation, subword encoding, template
/// assembly, and padding over batches. The pipeline is read-only after
/// construction and may be invoked concurrently from multiple callers;
/// per-invocation scratch memory is owned by each call.
#[derive(Debug, Clone)]
pub struct TokenizerPipeline<T: TokenType> {
    normalizer: Normalizer,
    splitter: Splitter,
    specials: SpecialVocab<T>,
    encoder: EncoderKind<T>,
    assembler: Option<TemplateAssembler<T>>,
    config: PipelineConfig,
    pad_id: T,
    graph: PipelineGraph,
}

impl<T: TokenType> TokenizerPipeline<T> {
    /// Build a pipeline from a resolved tokenizer definition.
    ///
    /// ## Arguments
    /// * `encoder` - The subword encoder, already bound to its
    ///   vocabulary tables.
    /// * `specials` - The special-token slots.
    /// * `template` - The special-token layout, if any.
    /// * `split_rule` - Explicit split rule; defaults to the encoder's
    ///   preferred rule (rank-table patterns), then punctuation
    ///   isolation for `WordPiece`, whitespace otherwise.
    /// * `config` - The pipeline configuration.
    ///
    /// ## Returns
    /// A `TlResult<TokenizerPipeline>`; configuration conflicts and
    /// definition problems are fatal here rather than degraded later.
    pub fn try_new(
        encoder: EncoderKind<T>,
        specials: SpecialVocab<T>,
        template: Option<Template<T>>,
        split_rule: Option<SplitRule>,
        config: PipelineConfig,
    ) -> TlResult<Self> {
        config.validate()?;

        if config.byte_level() != encoder.is_byte_level() {
            return Err(TokenloomError::ConfigConflict(format!(
                "byte_level = {} but the encoder byte table says {}",
                config.byte_level(),
                encoder.is_byte_level()
            )));
        }

        let normalizer = Normalizer::from_flags(config.lowercase(), config.strip_accents());

        let rule = split_rule
            .or_else(|| encoder.preferred_split_rule())
            .unwrap_or(match &encoder {
                EncoderKind::WordPiece(_) => SplitRule::Punctuation,
                _ => SplitRule::Whitespace,
            });
        let splitter = Splitter::try_new(&rule, specials.special_pattern().as_deref())?;

        let assembler = template.map(|t| {
            TemplateAssembler::new(
                t,
                config.add_special_tokens(),
                config.max_length(),
                config.truncation_side(),
            )
        });

        let mut stages = Vec::new();
        if !normalizer.is_empty() {
            stages.push(StageDesc::Normalize);
        }
        stages.push(StageDesc::Split);
        stages.push(StageDesc::Encode);
        if assembler.is_some() {
            stages.push(StageDesc::Assemble);
        }
        stages.push(StageDesc::Pad);
        let graph = PipelineGraph::try_new(stages)?;

        let pad_id = specials.pad().unwrap_or_else(T::zero);

        Ok(Self {
            normalizer,
            splitter,
            specials,
            encoder,
            assembler,
            config,
            pad_id,
            graph,
        })
    }

    /// The validated stage graph.
    pub fn graph(&self) -> &PipelineGraph {
        &self.graph
    }

    /// The pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The special-token slots.
    pub fn specials(&self) -> &SpecialVocab<T> {
        &self.specials
    }

    /// Encode one row: normalize, split, and encode every span.
    ///
    /// Pure per-row: depends only on the row's text plus the immutable
    /// definition tables, which is what makes rows independently
    /// schedulable.
    pub fn encode_row(
        &self,
        text: &str,
        scratch: &mut EncodeScratch<T>,
    ) -> Vec<T> {
        let normalized = self.normalizer.normalize(text);

        let mut tokens = Vec::new();
        for span in self.splitter.split(&normalized) {
            match span {
                Span::Text(s) => self.encoder.encode_append(&s, &mut tokens, scratch),
                Span::Special(s) => {
                    tokens.push(self.specials.lookup_token(s.as_bytes()).unwrap());
                }
            }
        }
        tokens
    }

    /// Encode a batch into assembled, unpadded id rows.
    pub fn encode_rows(
        &self,
        batch: &[&str],
    ) -> RaggedBatch<T> {
        let mut scratch = EncodeScratch::new();
        let rows: RaggedBatch<T> = batch
            .iter()
            .map(|text| self.encode_row(text, &mut scratch))
            .collect();

        self.assemble_rows(rows)
    }

    /// Run the assembly stage, when one is configured.
    pub(crate) fn assemble_rows(
        &self,
        rows: RaggedBatch<T>,
    ) -> RaggedBatch<T> {
        match &self.assembler {
            Some(assembler) => assembler.assemble_batch(rows),
            None => rows,
        }
    }

    /// The pair assembler, when a template is configured.
    #[cfg(feature = "rayon")]
    pub(crate) fn assembler(&self) -> Option<&TemplateAssembler<T>> {
        self.assembler.as_ref()
    }

    /// Encode a batch into the final named tensors.
    ///
    /// ## Arguments
    /// * `batch` - The input strings, one row each.
    ///
    /// ## Returns
    /// A `TlResult<EncodedTensors>`.
    pub fn encode_batch(
        &self,
        batch: &[&str],
    ) -> TlResult<EncodedTensors<T>> {
        self.pad_rows(self.encode_rows(batch))
    }

    /// Encode a batch of sequence pairs into the final named tensors,
    /// including `token_type_ids`.
    ///
    /// ## Arguments
    /// * `batch` - The input string pairs, one row each.
    ///
    /// ## Returns
    /// A `TlResult<EncodedTensors>`; pair input without a configured
    /// pair-capable template is a call-shape error.
    pub fn encode_pair_batch(
        &self,
        batch: &[(&str, &str)],
    ) -> TlResult<EncodedTensors<T>> {
        let Some(assembler) = &self.assembler else {
            return Err(TokenloomError::TemplateMismatch(
                "pair input requires a configured template".into(),
            ));
        };

        let mut scratch = EncodeScratch::new();
        let firsts: RaggedBatch<T> = batch
            .iter()
            .map(|(a, _)| self.encode_row(a, &mut scratch))
            .collect();
        let seconds: RaggedBatch<T> = batch
            .iter()
            .map(|(_, b)| self.encode_row(b, &mut scratch))
            .collect();

        let (ids, type_ids) = assembler.assemble_pair_batch(firsts, seconds)?;
        let spec = self.config.padding_spec();

        Ok(EncodedTensors::from_parts(
            PaddedBatch::from_ragged(&ids, self.pad_id, &spec)?,
            Some(PaddedBatch::from_ragged(&type_ids, 0, &spec)?),
        ))
    }

    /// Pad assembled rows into the final tensors.
    pub(crate) fn pad_rows(
        &self,
        rows: RaggedBatch<T>,
    ) -> TlResult<EncodedTensors<T>> {
        Ok(EncodedTensors::from_parts(
            PaddedBatch::from_ragged(&rows, self.pad_id, &self.config.padding_spec())?,
            None,
        ))
    }
}
