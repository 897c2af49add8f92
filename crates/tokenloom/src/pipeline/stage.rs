//! # Stage Descriptors & Graph Validation

use crate::errors::{TlResult, TokenloomError};

/// The value type flowing across a stage boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageIo {
    /// A batch of strings.
    Strings,

    /// A ragged batch of text spans.
    Spans,

    /// A ragged batch of token ids.
    Ids,

    /// Fixed-shape numeric tensors.
    Tensors,
}

/// The closed set of pipeline stage kinds.
///
/// The legal stage set is fixed at design time; descriptors carry the
/// stage's IO contract, the components themselves live on the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageDesc {
    /// Unicode/case normalization.
    Normalize,

    /// Pattern-based span splitting.
    Split,

    /// Subword encoding.
    Encode,

    /// Special-token template assembly.
    Assemble,

    /// Padding/truncation into fixed-shape tensors. Terminal.
    Pad,

    /// Id -> string decoding. Terminal.
    Decode,
}

impl StageDesc {
    /// The stage's input type.
    pub fn input(&self) -> StageIo {
        match self {
            StageDesc::Normalize => StageIo::Strings,
            StageDesc::Split => StageIo::Strings,
            StageDesc::Encode => StageIo::Spans,
            StageDesc::Assemble => StageIo::Ids,
            StageDesc::Pad => StageIo::Ids,
            StageDesc::Decode => StageIo::Ids,
        }
    }

    /// The stage's output type.
    pub fn output(&self) -> StageIo {
        match self {
            StageDesc::Normalize => StageIo::Strings,
            StageDesc::Split => StageIo::Spans,
            StageDesc::Encode => StageIo::Ids,
            StageDesc::Assemble => StageIo::Ids,
            StageDesc::Pad => StageIo::Tensors,
            StageDesc::Decode => StageIo::Strings,
        }
    }

    /// Terminal stages produce the pipeline's final tensors or strings.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StageDesc::Pad | StageDesc::Decode)
    }
}

/// An ordered, acyclic, type-checked stage list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineGraph {
    stages: Vec<StageDesc>,
}

impl PipelineGraph {
    /// Validate and build a graph from an ordered stage list.
    ///
    /// ## Arguments
    /// * `stages` - The stage descriptors, in execution order.
    ///
    /// ## Returns
    /// A `TlResult<PipelineGraph>`; adjacent IO mismatches, a
    /// non-terminal tail, or a terminal stage mid-list are fatal.
    pub fn try_new(stages: Vec<StageDesc>) -> TlResult<Self> {
        let Some(last) = stages.last() else {
            return Err(TokenloomError::GraphConflict("empty stage list".into()));
        };

        for pair in stages.windows(2) {
            if pair[0].output() != pair[1].input() {
                return Err(TokenloomError::GraphConflict(format!(
                    "{:?} produces {:?} but {:?} consumes {:?}",
                    pair[0],
                    pair[0].output(),
                    pair[1],
                    pair[1].input()
                )));
            }
        }

        if !last.is_terminal() {
            return Err(TokenloomError::GraphConflict(format!(
                "last stage {last:?} is not terminal"
            )));
        }
        if stages[..stages.len() - 1].iter().any(StageDesc::is_terminal) {
            return Err(TokenloomError::GraphConflict(
                "terminal stage before the end of the list".into(),
            ));
        }

        Ok(Self { stages })
    }

    /// The validated stages, in execution order.
    pub fn stages(&self) -> &[StageDesc] {
        &self.stages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_direction() {
        let graph = PipelineGraph::try_new(vec![
            StageDesc::Normalize,
            StageDesc::Split,
            StageDesc::Encode,
            StageDesc::Assemble,
            StageDesc::Pad,
        ])
        .unwrap();

        assert_eq!(graph.stages().len(), 5);
    }

    #[test]
    fn test_detokenize_direction() {
        assert!(PipelineGraph::try_new(vec![StageDesc::Decode]).is_ok());
    }

    #[test]
    fn test_bad_graphs_are_fatal() {
        // Empty.
        assert!(PipelineGraph::try_new(vec![]).is_err());

        // IO mismatch: Split feeds Spans, Assemble wants Ids.
        assert!(
            PipelineGraph::try_new(vec![StageDesc::Split, StageDesc::Assemble]).is_err()
        );

        // Non-terminal tail.
        assert!(
            PipelineGraph::try_new(vec![StageDesc::Split, StageDesc::Encode]).is_err()
        );

        // Terminal mid-list.
        assert!(
            PipelineGraph::try_new(vec![
                StageDesc::Split,
                StageDesc::Encode,
                StageDesc::Pad,
                StageDesc::Decode,
            ])
            .is_err()
        );
    }
}
