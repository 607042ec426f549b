//! Model error taxonomy.

use thiserror::Error;

/// Errors raised by position resolution and tree operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("position {0:?} does not resolve to an element boundary")]
    InvalidPosition(Vec<usize>),
    #[error("offset {offset} exceeds the parent size {max}")]
    OffsetOutOfBounds { offset: usize, max: usize },
    #[error("range boundaries are not in one parent")]
    NotFlat,
    #[error("merge position is not between two sibling elements")]
    InvalidMergePosition,
    #[error("split position is inside the document root")]
    CannotSplitRoot,
    #[error("move target lies inside the moved range")]
    MoveTargetInsideSource,
    #[error("schema does not allow {child} inside {parent}")]
    SchemaViolation { parent: String, child: String },
    #[error("selection ranges overlap")]
    OverlappingRanges,
}
