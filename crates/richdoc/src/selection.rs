//! Selection: ordered non-overlapping ranges plus pending attributes.

use serde_json::Value;

use crate::error::ModelError;
use crate::node::Attributes;
use crate::position::Position;
use crate::range::Range;

/// The selection: an ordered set of non-overlapping ranges, a flag telling
/// whether the last range is backward (so anchor/focus order is
/// recoverable), and the pending attribute map.
///
/// Pending attributes are independent of tree content; they describe what
/// newly typed text at a caret should look like and survive until
/// explicitly changed.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    ranges: Vec<Range>,
    backward: bool,
    attributes: Attributes,
}

impl Selection {
    pub fn new() -> Self {
        Self {
            ranges: Vec::new(),
            backward: false,
            attributes: Attributes::new(),
        }
    }

    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    /// `true` when the last range is backward (focus before anchor).
    pub fn is_backward(&self) -> bool {
        self.backward
    }

    /// `true` when every range is a caret.
    pub fn is_collapsed(&self) -> bool {
        !self.ranges.is_empty() && self.ranges.iter().all(Range::is_collapsed)
    }

    /// Anchor of the last range, honoring the backward flag.
    pub fn anchor(&self) -> Option<&Position> {
        self.ranges
            .last()
            .map(|r| if self.backward { r.end() } else { r.start() })
    }

    /// Focus of the last range, honoring the backward flag.
    pub fn focus(&self) -> Option<&Position> {
        self.ranges
            .last()
            .map(|r| if self.backward { r.start() } else { r.end() })
    }

    /// Replace the ranges, keeping them ordered; overlapping ranges are
    /// rejected.
    pub fn set_ranges(&mut self, mut ranges: Vec<Range>, backward: bool) -> Result<(), ModelError> {
        ranges.sort_by(|a, b| a.start().cmp(b.start()));
        for pair in ranges.windows(2) {
            if pair[1].start() < pair[0].end() {
                return Err(ModelError::OverlappingRanges);
            }
        }
        self.ranges = ranges;
        self.backward = backward;
        Ok(())
    }

    /// Collapse to a single caret; the pending attributes are untouched.
    pub fn collapse_to(&mut self, position: Position) {
        self.ranges = vec![Range::collapsed(position)];
        self.backward = false;
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn get_attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn set_attributes(&mut self, attributes: Attributes) {
        self.attributes = attributes;
    }

    pub(crate) fn set_attribute(&mut self, key: &str, value: Value) -> Option<Value> {
        self.attributes.insert(key.to_owned(), value)
    }

    pub(crate) fn remove_attribute(&mut self, key: &str) -> Option<Value> {
        self.attributes.shift_remove(key)
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
