//! # Special-Token Template Assembler

use crate::errors::{TlResult, TokenloomError};
use crate::ragged::{RaggedBatch, Side};
use crate::types::TokenType;
use crate::vocab::SpecialVocab;

/// The arrangement of special tokens around one or two sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template<T> {
    /// `[CLS] A [SEP]`, and `[CLS] A [SEP] B [SEP]` for pairs.
    Classifier {
        /// Leading classifier token.
        cls: T,
        /// Separator token.
        sep: T,
    },

    /// `<bos> A <eos>`; single sequences only.
    Sequence {
        /// Optional leading token.
        bos: Option<T>,
        /// Optional trailing token.
        eos: Option<T>,
    },
}

impl<T: TokenType> Template<T> {
    /// Build the classifier layout from special slots.
    ///
    /// ## Returns
    /// A `TlResult<Template>`; absent cls/sep slots are fatal.
    pub fn classifier(specials: &SpecialVocab<T>) -> TlResult<Self> {
        Ok(Template::Classifier {
            cls: specials.require_cls()?,
            sep: specials.require_sep()?,
        })
    }

    /// Build the sequence layout from whichever bos/eos slots exist.
    pub fn sequence(specials: &SpecialVocab<T>) -> Self {
        Template::Sequence {
            bos: specials.bos(),
            eos: specials.eos(),
        }
    }

    /// The number of ids a single-sequence assembly injects.
    fn single_overhead(&self) -> usize {
        match self {
            Template::Classifier { .. } => 2,
            Template::Sequence { bos, eos } => {
                usize::from(bos.is_some()) + usize::from(eos.is_some())
            }
        }
    }

    /// The number of ids a pair assembly injects.
    fn pair_overhead(&self) -> usize {
        match self {
            Template::Classifier { .. } => 3,
            Template::Sequence { .. } => 0,
        }
    }
}

/// Assembles encoded sequences into final id rows.
///
/// Truncation applies before special-token insertion, against the
/// budget left once the injected ids are accounted for; when a pair
/// shares a joint budget the longer sequence is reduced first.
#[derive(Debug, Clone)]
pub struct TemplateAssembler<T: TokenType> {
    template: Template<T>,
    add_special_tokens: bool,
    max_length: Option<usize>,
    truncation_side: Side,
}

impl<T: TokenType> TemplateAssembler<T> {
    /// Build an assembler.
    ///
    /// ## Arguments
    /// * `template` - The special-token layout.
    /// * `add_special_tokens` - When false, assembly degenerates to
    ///   plain concatenation.
    /// * `max_length` - Joint budget including injected specials.
    /// * `truncation_side` - Which end content drops from.
    pub fn new(
        template: Template<T>,
        add_special_tokens: bool,
        max_length: Option<usize>,
        truncation_side: Side,
    ) -> Self {
        Self {
            template,
            add_special_tokens,
            max_length,
            truncation_side,
        }
    }

    /// The configured template.
    pub fn template(&self) -> &Template<T> {
        &self.template
    }

    fn truncate(
        &self,
        row: &mut Vec<T>,
        budget: usize,
    ) {
        if row.len() > budget {
            match self.truncation_side {
                Side::Right => row.truncate(budget),
                Side::Left => {
                    row.drain(..row.len() - budget);
                }
            }
        }
    }

    /// Assemble one encoded sequence.
    pub fn assemble(
        &self,
        mut row: Vec<T>,
    ) -> Vec<T> {
        let overhead = if self.add_special_tokens {
            self.template.single_overhead()
        } else {
            0
        };
        if let Some(max) = self.max_length {
            self.truncate(&mut row, max.saturating_sub(overhead));
        }

        if !self.add_special_tokens {
            return row;
        }

        match self.template {
            Template::Classifier { cls, sep } => {
                let mut out = Vec::with_capacity(row.len() + 2);
                out.push(cls);
                out.extend(row);
                out.push(sep);
                out
            }
            Template::Sequence { bos, eos } => {
                let mut out = Vec::with_capacity(row.len() + 2);
                out.extend(bos);
                out.extend(row);
                out.extend(eos);
                out
            }
        }
    }

    /// Assemble one sequence pair.
    ///
    /// ## Arguments
    /// * `first` - The first encoded sequence.
    /// * `second` - The second encoded sequence.
    ///
    /// ## Returns
    /// A `TlResult<(ids, token_type_ids)>`; type ids are 0 over the
    /// first sequence and its shared specials, 1 over the second.
    /// Sequence-layout templates reject pair calls.
    pub fn assemble_pair(
        &self,
        mut first: Vec<T>,
        mut second: Vec<T>,
    ) -> TlResult<(Vec<T>, Vec<u8>)> {
        let Template::Classifier { cls, sep } = self.template else {
            return Err(TokenloomError::TemplateMismatch(
                "sequence template does not define a pair layout".into(),
            ));
        };

        let overhead = if self.add_special_tokens {
            self.template.pair_overhead()
        } else {
            0
        };
        if let Some(max) = self.max_length {
            // Longest-first: reduce the longer sequence one id at a
            // time until the joint budget fits.
            let budget = max.saturating_sub(overhead);
            while first.len() + second.len() > budget {
                let row = if second.len() > first.len() {
                    &mut second
                } else {
                    &mut first
                };
                if row.is_empty() {
                    break;
                }
                match self.truncation_side {
                    Side::Right => {
                        row.pop();
                    }
                    Side::Left => {
                        row.remove(0);
                    }
                }
            }
        }

        let mut ids = Vec::with_capacity(first.len() + second.len() + overhead);
        let mut type_ids = Vec::with_capacity(ids.capacity());

        if self.add_special_tokens {
            ids.push(cls);
            ids.extend(&first);
            ids.push(sep);
            type_ids.extend(core::iter::repeat_n(0, first.len() + 2));

            ids.extend(&second);
            ids.push(sep);
            type_ids.extend(core::iter::repeat_n(1, second.len() + 1));
        } else {
            ids.extend(&first);
            type_ids.extend(core::iter::repeat_n(0, first.len()));
            ids.extend(&second);
            type_ids.extend(core::iter::repeat_n(1, second.len()));
        }

        Ok((ids, type_ids))
    }

    /// Assemble every row of an encoded batch.
    pub fn assemble_batch(
        &self,
        batch: RaggedBatch<T>,
    ) -> RaggedBatch<T> {
        batch.map_rows(|row| self.assemble(row.to_vec()))
    }

    /// Assemble two aligned encoded batches as pairs.
    ///
    /// ## Returns
    /// A `TlResult<(ids, token_type_ids)>` ragged pair; mismatched row
    /// counts are a call-shape error.
    pub fn assemble_pair_batch(
        &self,
        first: RaggedBatch<T>,
        second: RaggedBatch<T>,
    ) -> TlResult<(RaggedBatch<T>, RaggedBatch<u8>)> {
        if first.num_rows() != second.num_rows() {
            return Err(TokenloomError::TemplateMismatch(format!(
                "pair batches disagree on rows: {} vs {}",
                first.num_rows(),
                second.num_rows()
            )));
        }

        let mut ids = RaggedBatch::new();
        let mut type_ids = RaggedBatch::new();
        for (a, b) in first.rows().zip(second.rows()) {
            let (row_ids, row_types) = self.assemble_pair(a.to_vec(), b.to_vec())?;
            ids.push_row(row_ids);
            type_ids.push_row(row_types);
        }
        Ok((ids, type_ids))
    }
}
