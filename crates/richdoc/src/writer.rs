//! The writer, the single mutation gateway.
//!
//! A [`Writer`] borrows the document mutably for the duration of one change
//! session, applies operations, and records each one with its inverses in a
//! [`Batch`].  Callers never touch the tree directly.

use serde_json::Value;

use crate::document::Document;
use crate::error::ModelError;
use crate::node::Node;
use crate::operation::{Batch, Operation};
use crate::position::Position;
use crate::range::Range;

/// Exclusive change session over a document.
#[derive(Debug)]
pub struct Writer<'a> {
    doc: &'a mut Document,
    batch: Batch,
}

impl<'a> Writer<'a> {
    pub fn new(doc: &'a mut Document) -> Self {
        Self {
            doc,
            batch: Batch::new(),
        }
    }

    pub fn document(&self) -> &Document {
        self.doc
    }

    pub fn batch(&self) -> &Batch {
        &self.batch
    }

    /// End the session, yielding the recorded batch.
    pub fn finish(self) -> Batch {
        self.batch
    }

    /// Apply one operation and record it with its inverses.
    pub fn push(&mut self, op: Operation) -> Result<(), ModelError> {
        let inverse = op.apply(self.doc)?;
        self.batch.record(op, inverse);
        Ok(())
    }

    pub fn insert(&mut self, at: Position, nodes: Vec<Node>) -> Result<(), ModelError> {
        self.push(Operation::Insert { at, nodes })
    }

    /// Remove the content of a range.
    ///
    /// A non-flat range is decomposed into its minimal flat subranges,
    /// removed back to front so the earlier subranges keep their paths.
    pub fn remove(&mut self, range: Range) -> Result<(), ModelError> {
        if range.is_flat() {
            return self.push(Operation::Remove { range });
        }
        let flat = range.minimal_flat_ranges(self.doc)?;
        for sub in flat.into_iter().rev() {
            self.push(Operation::Remove { range: sub })?;
        }
        Ok(())
    }

    pub fn move_range(&mut self, range: Range, target: Position) -> Result<(), ModelError> {
        self.push(Operation::Move { range, target })
    }

    pub fn merge(&mut self, at: Position) -> Result<(), ModelError> {
        self.push(Operation::Merge { at })
    }

    pub fn split(&mut self, at: Position) -> Result<(), ModelError> {
        self.push(Operation::Split { at })
    }

    pub fn set_selection_attribute(&mut self, key: &str, value: Value) -> Result<(), ModelError> {
        self.push(Operation::SetSelectionAttribute {
            key: key.to_owned(),
            value,
        })
    }

    pub fn remove_selection_attribute(&mut self, key: &str) -> Result<(), ModelError> {
        self.push(Operation::RemoveSelectionAttribute {
            key: key.to_owned(),
        })
    }

    /// Replace the selection ranges.  Range placement is not part of the
    /// operation record; only attribute changes are.
    pub fn set_selection(&mut self, ranges: Vec<Range>, backward: bool) -> Result<(), ModelError> {
        self.doc.selection.set_ranges(ranges, backward)
    }

    /// Collapse the selection to a caret.
    pub fn collapse_selection_to(&mut self, position: Position) {
        self.doc.selection.collapse_to(position);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
