//! # Fixed-Shape Materialization of Ragged Batches

use crate::errors::{TlResult, TokenloomError};
use crate::ragged::RaggedBatch;
use crate::types::TokenType;

/// Which end of a row padding or truncation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    /// Operate on the left (leading) end.
    Left,

    /// Operate on the right (trailing) end.
    #[default]
    Right,
}

/// Padding and truncation policy for [`PaddedBatch::from_ragged`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PaddingSpec {
    /// Hard length cap; rows longer than this are truncated.
    pub max_length: Option<usize>,

    /// Pad every row to `max_length` even when the batch is shorter.
    pub pad_to_max: bool,

    /// Which end truncation drops from.
    pub truncation_side: Side,

    /// Which end padding fills.
    pub padding_side: Side,
}

impl PaddingSpec {
    /// Validate the spec.
    ///
    /// ## Returns
    /// A `TlResult<()>`, with a config conflict when `pad_to_max` is
    /// requested without a `max_length`.
    pub fn validate(&self) -> TlResult<()> {
        if self.pad_to_max && self.max_length.is_none() {
            return Err(TokenloomError::ConfigConflict(
                "pad_to_max requires max_length".into(),
            ));
        }
        Ok(())
    }
}

/// A dense `[rows, cols]` materialization of a ragged token batch.
///
/// `input_ids` is row-major; `attention_mask[i * cols + j] == 1` iff
/// column `j` of row `i` holds a real (non-padding) token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedBatch<T> {
    /// Row-major `[rows, cols]` token ids.
    input_ids: Vec<T>,

    /// Row-major `[rows, cols]` 1/0 mask.
    attention_mask: Vec<u8>,

    rows: usize,
    cols: usize,
}

impl<T: TokenType> PaddedBatch<T> {
    /// Materialize a ragged batch into a dense tensor pair.
    ///
    /// Every row is truncated to the common length from the configured
    /// truncation side, then padded on the configured padding side.
    /// Zero-length rows survive as all-padding rows.
    ///
    /// ## Arguments
    /// * `batch` - The ragged token batch.
    /// * `pad_id` - The token id used to fill padding columns.
    /// * `spec` - The padding/truncation policy.
    ///
    /// ## Returns
    /// A `TlResult<PaddedBatch>`, with errors only on conflicting specs.
    pub fn from_ragged(
        batch: &RaggedBatch<T>,
        pad_id: T,
        spec: &PaddingSpec,
    ) -> TlResult<Self> {
        spec.validate()?;

        let natural = batch.rows().map(<[T]>::len).max().unwrap_or(0);
        let cols = match spec.max_length {
            Some(max) if spec.pad_to_max => max,
            Some(max) => natural.min(max),
            None => natural,
        };

        let rows = batch.num_rows();
        let mut input_ids = Vec::with_capacity(rows * cols);
        let mut attention_mask = Vec::with_capacity(rows * cols);

        for row in batch.rows() {
            let kept = if row.len() > cols {
                match spec.truncation_side {
                    Side::Right => &row[..cols],
                    Side::Left => &row[row.len() - cols..],
                }
            } else {
                row
            };

            let fill = cols - kept.len();
            match spec.padding_side {
                Side::Right => {
                    input_ids.extend_from_slice(kept);
                    input_ids.extend(core::iter::repeat_n(pad_id, fill));
                    attention_mask.extend(core::iter::repeat_n(1, kept.len()));
                    attention_mask.extend(core::iter::repeat_n(0, fill));
                }
                Side::Left => {
                    input_ids.extend(core::iter::repeat_n(pad_id, fill));
                    input_ids.extend_from_slice(kept);
                    attention_mask.extend(core::iter::repeat_n(0, fill));
                    attention_mask.extend(core::iter::repeat_n(1, kept.len()));
                }
            }
        }

        Ok(Self {
            input_ids,
            attention_mask,
            rows,
            cols,
        })
    }

    /// The number of rows.
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// The common row length.
    pub fn num_cols(&self) -> usize {
        self.cols
    }

    /// The row-major `[rows, cols]` id buffer.
    pub fn input_ids(&self) -> &[T] {
        &self.input_ids
    }

    /// The row-major `[rows, cols]` attention mask.
    pub fn attention_mask(&self) -> &[u8] {
        &self.attention_mask
    }

    /// Get row `i` of the id tensor.
    pub fn row(
        &self,
        i: usize,
    ) -> &[T] {
        &self.input_ids[i * self.cols..(i + 1) * self.cols]
    }

    /// Get row `i` of the attention mask.
    pub fn mask_row(
        &self,
        i: usize,
    ) -> &[u8] {
        &self.attention_mask[i * self.cols..(i + 1) * self.cols]
    }

    /// Recover the unpadded rows, using the mask to drop padding columns.
    pub fn unpad(&self) -> RaggedBatch<T> {
        let mut out = RaggedBatch::new();
        for i in 0..self.rows {
            out.push_row(
                self.row(i)
                    .iter()
                    .zip(self.mask_row(i))
                    .filter_map(|(&t, &m)| (m == 1).then_some(t)),
            );
        }
        out
    }
}
