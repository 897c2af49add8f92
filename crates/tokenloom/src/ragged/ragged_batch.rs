//! # Flat-Buffer + Offsets Ragged Batch

use crate::errors::{TlResult, TokenloomError};

/// A batch of `N` variable-length rows of element type `T`.
///
/// Stored as a flat ordered element buffer plus `N + 1` monotonically
/// non-decreasing offsets; row `i` occupies `flat[offsets[i]..offsets[i+1]]`.
/// Rows may be empty, and empty rows are preserved by every operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaggedBatch<T> {
    /// Flat element buffer.
    flat: Vec<T>,

    /// Row-delimiting offsets; `offsets[0] == 0`, `offsets[N] == flat.len()`.
    offsets: Vec<usize>,
}

impl<T> Default for RaggedBatch<T> {
    fn default() -> Self {
        Self {
            flat: Vec::new(),
            offsets: vec![0],
        }
    }
}

impl<T> FromIterator<Vec<T>> for RaggedBatch<T> {
    fn from_iter<I: IntoIterator<Item = Vec<T>>>(rows: I) -> Self {
        let mut batch = Self::default();
        for row in rows {
            batch.push_row(row);
        }
        batch
    }
}

impl<T> RaggedBatch<T> {
    /// Create an empty batch with zero rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a batch from an explicit flat buffer and offsets.
    ///
    /// ## Arguments
    /// * `flat` - The flat element buffer.
    /// * `offsets` - The row-delimiting offsets.
    ///
    /// ## Returns
    /// A `TlResult<RaggedBatch>`, with errors on malformed offsets.
    pub fn try_new(
        flat: Vec<T>,
        offsets: Vec<usize>,
    ) -> TlResult<Self> {
        if offsets.first() != Some(&0) {
            return Err(TokenloomError::MalformedOffsets(
                "offsets must start at 0".into(),
            ));
        }
        if offsets.last() != Some(&flat.len()) {
            return Err(TokenloomError::MalformedOffsets(format!(
                "last offset {:?} != flat len {}",
                offsets.last(),
                flat.len()
            )));
        }
        if offsets.windows(2).any(|w| w[0] > w[1]) {
            return Err(TokenloomError::MalformedOffsets(
                "offsets must be non-decreasing".into(),
            ));
        }
        Ok(Self { flat, offsets })
    }

    /// Build a batch from a collection of rows.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = Vec<T>>,
    {
        rows.into_iter().collect()
    }

    /// Append one row to the batch.
    ///
    /// ## Arguments
    /// * `row` - The elements of the new row; may be empty.
    pub fn push_row<I>(
        &mut self,
        row: I,
    ) where
        I: IntoIterator<Item = T>,
    {
        self.flat.extend(row);
        self.offsets.push(self.flat.len());
    }

    /// The number of rows in the batch.
    pub fn num_rows(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Check if the batch has zero rows.
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// Get row `i` as a slice.
    ///
    /// ## Panics
    /// Panics if `i >= num_rows()`.
    pub fn row(
        &self,
        i: usize,
    ) -> &[T] {
        &self.flat[self.offsets[i]..self.offsets[i + 1]]
    }

    /// Iterate over the rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.offsets.windows(2).map(|w| &self.flat[w[0]..w[1]])
    }

    /// Get the flat element buffer.
    pub fn flat(&self) -> &[T] {
        &self.flat
    }

    /// Get the row-delimiting offsets.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Convert the batch into independently owned rows.
    pub fn into_rows(self) -> Vec<Vec<T>>
    where
        T: Clone,
    {
        self.rows().map(<[T]>::to_vec).collect()
    }

    /// Apply `f` independently per element, preserving row boundaries.
    ///
    /// Consumes the batch; the output is a newly allocated batch owned by
    /// the caller.
    pub fn map<U, F>(
        self,
        f: F,
    ) -> RaggedBatch<U>
    where
        F: Fn(&T) -> U,
    {
        RaggedBatch {
            flat: self.flat.iter().map(f).collect(),
            offsets: self.offsets,
        }
    }

    /// Apply `f` producing zero-or-more outputs per input element.
    ///
    /// Row boundaries are preserved; a row whose every element expands to
    /// nothing becomes an empty row, it does not disappear.
    pub fn flat_map<U, I, F>(
        self,
        f: F,
    ) -> RaggedBatch<U>
    where
        F: Fn(&T) -> I,
        I: IntoIterator<Item = U>,
    {
        let mut out = RaggedBatch::new();
        for row in self.rows() {
            out.push_row(row.iter().flat_map(&f));
        }
        out
    }

    /// Apply `f` to each whole row, rebuilding the batch from its outputs.
    pub fn map_rows<U, F>(
        self,
        f: F,
    ) -> RaggedBatch<U>
    where
        F: Fn(&[T]) -> Vec<U>,
    {
        let mut out = RaggedBatch::new();
        for row in self.rows() {
            out.push_row(f(row));
        }
        out
    }
}
