//! # Detokenize-Direction Pipeline

use std::sync::Arc;

use crate::decoders::{CleanupRules, PieceJoiner, TokenDecoder};
use crate::errors::TlResult;
use crate::pipeline::{PipelineConfig, PipelineGraph, StageDesc};
use crate::ragged::{PaddedBatch, RaggedBatch};
use crate::types::TokenType;
use crate::vocab::{SpecialVocab, TokenVocab};

/// The detokenize-direction pipeline: the decode stage alone.
#[derive(Debug, Clone)]
pub struct DetokenizerPipeline<T: TokenType> {
    decoder: TokenDecoder<T>,
    graph: PipelineGraph,
}

impl<T: TokenType> DetokenizerPipeline<T> {
    /// Wrap an already-built decoder.
    pub fn new(decoder: TokenDecoder<T>) -> Self {
        // A single Decode stage is always a valid graph.
        let graph = PipelineGraph::try_new(vec![StageDesc::Decode]).unwrap();
        Self { decoder, graph }
    }

    /// Build the decode direction from a resolved definition.
    ///
    /// ## Arguments
    /// * `vocab` - The token vocabulary.
    /// * `specials` - The special-token slots.
    /// * `joiner` - The piece re-join convention of the forward model.
    /// * `config` - The pipeline configuration; `skip_special_tokens`
    ///   and `clean_up_tokenization_spaces` apply here.
    ///
    /// ## Returns
    /// A `TlResult<DetokenizerPipeline>`.
    pub fn try_new(
        vocab: Arc<TokenVocab<T>>,
        specials: SpecialVocab<T>,
        joiner: PieceJoiner,
        config: &PipelineConfig,
    ) -> TlResult<Self> {
        config.validate()?;

        let mut decoder = TokenDecoder::new(vocab, specials, joiner)
            .with_skip_special_tokens(config.skip_special_tokens());
        if config.clean_up_tokenization_spaces() {
            decoder = decoder.with_cleanup(CleanupRules::default());
        }

        Ok(Self::new(decoder))
    }

    /// The validated stage graph.
    pub fn graph(&self) -> &PipelineGraph {
        &self.graph
    }

    /// The underlying decoder.
    pub fn decoder(&self) -> &TokenDecoder<T> {
        &self.decoder
    }

    /// Decode ragged id rows into `string_output`.
    pub fn decode_batch(
        &self,
        batch: &RaggedBatch<T>,
    ) -> Vec<String> {
        self.decoder.decode_batch(batch)
    }

    /// Decode a padded `[N, L]` tensor, dropping padding via the mask.
    pub fn decode_padded(
        &self,
        padded: &PaddedBatch<T>,
    ) -> Vec<String> {
        self.decoder.decode_padded(padded)
    }
}
