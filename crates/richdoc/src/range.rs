//! Ranges: ordered position pairs and the flatten query.

use crate::document::Document;
use crate::error::ModelError;
use crate::position::Position;

/// An ordered pair of positions, `start <= end` in document order.
///
/// A collapsed range (`start == end`) represents a caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    start: Position,
    end: Position,
}

impl Range {
    /// Range over `[start, end]`; the boundaries are reordered if given
    /// backwards.
    pub fn new(start: Position, end: Position) -> Self {
        if end < start {
            Self { start: end, end: start }
        } else {
            Self { start, end }
        }
    }

    pub fn collapsed(at: Position) -> Self {
        Self { start: at.clone(), end: at }
    }

    pub fn start(&self) -> &Position {
        &self.start
    }

    pub fn end(&self) -> &Position {
        &self.end
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Both boundaries sit in the same parent element.
    pub fn is_flat(&self) -> bool {
        self.start.parent_path() == self.end.parent_path()
    }

    pub fn contains_position(&self, pos: &Position) -> bool {
        *pos > self.start && *pos < self.end
    }

    /// The flatten query: the minimal ordered sequence of flat subranges
    /// that together cover this range.
    ///
    /// Climbs from `start` up to the depth where the boundary paths diverge,
    /// then descends toward `end`.  Each produced subrange covers whole
    /// nodes or a contiguous span of text characters inside one parent, so
    /// it decides which nodes are fully vs. partially covered.
    pub fn minimal_flat_ranges(&self, doc: &Document) -> Result<Vec<Range>, ModelError> {
        let mut ranges = Vec::new();
        if self.is_collapsed() {
            return Ok(ranges);
        }
        let diff_at = self.start.common_prefix_len(&self.end);
        let mut pos = self.start.clone();

        // climb: cover everything from `start` to the end of each ancestor
        while pos.path().len() > diff_at + 1 {
            let parent = doc.element_at(pos.parent_path())?;
            let how_many = parent.max_offset() - pos.offset();
            if how_many > 0 {
                ranges.push(Range::new(pos.clone(), pos.shifted(how_many)));
            }
            pos = pos.after_parent().expect("path deeper than one component");
        }

        // descend: cover up to the offset `end` dictates at every depth
        while pos.path().len() <= self.end.path().len() {
            let offset = self.end.path()[pos.path().len() - 1];
            let how_many = offset - pos.offset();
            if how_many > 0 {
                ranges.push(Range::new(pos.clone(), pos.shifted(how_many)));
            }
            let mut path = pos.path().to_vec();
            *path.last_mut().expect("non-empty path") = offset;
            path.push(0);
            pos = Position::new(path);
        }
        Ok(ranges)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
