//! # Parallel Batch Wrappers
//!
//! Batch-level `rayon` parallelism over pipeline rows. Rows share only
//! the read-only definition tables, so no synchronization is needed
//! beyond the `Arc` clones; each worker owns its own scratch memory.

use rayon::prelude::*;

use crate::encoders::EncodeScratch;
use crate::errors::{TlResult, TokenloomError};
use crate::pipeline::{DetokenizerPipeline, EncodedTensors, TokenizerPipeline};
use crate::ragged::{PaddedBatch, RaggedBatch};
use crate::types::TokenType;

/// Batch-Level Parallel Tokenizer Wrapper.
///
/// Enables `rayon` encoding of batches; rows are distributed across
/// the global worker pool.
#[derive(Debug, Clone)]
pub struct ParallelTokenizer<T: TokenType> {
    /// Inner pipeline.
    pub inner: TokenizerPipeline<T>,
}

impl<T: TokenType> ParallelTokenizer<T> {
    /// Create a new parallel wrapper.
    ///
    /// ## Arguments
    /// * `inner` - The pipeline to wrap.
    pub fn new(inner: TokenizerPipeline<T>) -> Self {
        Self { inner }
    }

    fn par_rows(
        &self,
        batch: &[&str],
    ) -> RaggedBatch<T> {
        let rows: Vec<Vec<T>> = batch
            .par_iter()
            .map_init(EncodeScratch::new, |scratch, text| {
                self.inner.encode_row(text, scratch)
            })
            .collect();
        RaggedBatch::from_rows(rows)
    }

    /// Parallel version of [`TokenizerPipeline::encode_batch`].
    pub fn encode_batch(
        &self,
        batch: &[&str],
    ) -> TlResult<EncodedTensors<T>> {
        let rows = self.inner.assemble_rows(self.par_rows(batch));
        self.inner.pad_rows(rows)
    }

    /// Parallel version of [`TokenizerPipeline::encode_pair_batch`].
    pub fn encode_pair_batch(
        &self,
        batch: &[(&str, &str)],
    ) -> TlResult<EncodedTensors<T>> {
        let Some(assembler) = self.inner.assembler() else {
            return Err(TokenloomError::TemplateMismatch(
                "pair input requires a configured template".into(),
            ));
        };

        let firsts: Vec<&str> = batch.iter().map(|(a, _)| *a).collect();
        let seconds: Vec<&str> = batch.iter().map(|(_, b)| *b).collect();

        let (ids, type_ids) =
            assembler.assemble_pair_batch(self.par_rows(&firsts), self.par_rows(&seconds))?;

        let spec = self.inner.config().padding_spec();
        let pad_id = self
            .inner
            .specials()
            .pad()
            .unwrap_or_else(T::zero);

        Ok(EncodedTensors::from_parts(
            PaddedBatch::from_ragged(&ids, pad_id, &spec)?,
            Some(PaddedBatch::from_ragged(&type_ids, 0, &spec)?),
        ))
    }
}

/// Batch-Level Parallel Detokenizer Wrapper.
#[derive(Debug, Clone)]
pub struct ParallelDetokenizer<T: TokenType> {
    /// Inner pipeline.
    pub inner: DetokenizerPipeline<T>,
}

impl<T: TokenType> ParallelDetokenizer<T> {
    /// Create a new parallel wrapper.
    ///
    /// ## Arguments
    /// * `inner` - The pipeline to wrap.
    pub fn new(inner: DetokenizerPipeline<T>) -> Self {
        Self { inner }
    }

    /// Parallel version of [`DetokenizerPipeline::decode_batch`].
    pub fn decode_batch(
        &self,
        batch: &RaggedBatch<T>,
    ) -> Vec<String> {
        let rows: Vec<&[T]> = batch.rows().collect();
        rows.par_iter()
            .map(|row| self.inner.decoder().decode(row))
            .collect()
    }

    /// Parallel version of [`DetokenizerPipeline::decode_padded`].
    pub fn decode_padded(
        &self,
        padded: &PaddedBatch<T>,
    ) -> Vec<String> {
        self.decode_batch(&padded.unpad())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::decoders::PieceJoiner;
    use crate::encoders::{EncoderKind, WordPieceEncoder};
    use crate::pipeline::PipelineConfig;
    use crate::template::Template;
    use crate::types::{check_is_send, check_is_sync};
    use crate::vocab::{SpecialVocab, TokenVocab};

    type T = u32;

    #[test]
    fn test_parallel_matches_serial() {
        let vocab = Arc::new(
            TokenVocab::<T>::try_from_str_pairs([
                ("hello", 5),
                ("world", 6),
                ("[UNK]", 0),
                ("[CLS]", 1),
                ("[SEP]", 2),
                ("[PAD]", 3),
            ])
            .unwrap(),
        );
        let specials = SpecialVocab::default()
            .with_unk("[UNK]", 0)
            .with_cls("[CLS]", 1)
            .with_sep("[SEP]", 2)
            .with_pad("[PAD]", 3);

        let encoder = WordPieceEncoder::try_new(vocab.clone(), "##", &specials).unwrap();
        let template = Template::classifier(&specials).unwrap();
        let pipeline = TokenizerPipeline::try_new(
            EncoderKind::WordPiece(encoder),
            specials.clone(),
            Some(template),
            None,
            PipelineConfig::default(),
        )
        .unwrap();

        let parallel = ParallelTokenizer::new(pipeline.clone());
        check_is_send(&parallel);
        check_is_sync(&parallel);

        let batch = ["hello world", "world hello hello", "", "mystery"];
        let serial = pipeline.encode_batch(&batch).unwrap();
        let par = parallel.encode_batch(&batch).unwrap();

        assert_eq!(serial.input_ids(), par.input_ids());
        assert_eq!(serial.attention_mask(), par.attention_mask());

        let detok = DetokenizerPipeline::try_new(
            vocab,
            specials,
            PieceJoiner::Continuation("##".to_string()),
            &PipelineConfig::default().with_skip_special_tokens(true),
        )
        .unwrap();
        let par_detok = ParallelDetokenizer::new(detok.clone());

        let rows = pipeline.encode_rows(&batch);
        assert_eq!(detok.decode_batch(&rows), par_detok.decode_batch(&rows));
    }
}
