//! Structural deletion of the selected content.
//!
//! [`delete_contents`] removes everything the selection covers, optionally
//! merges the partially emptied boundary elements, collapses the selection
//! to a caret, and re-derives the caret's pending attributes from the
//! surrounding text.  All tree changes go through the writer, so the whole
//! deletion lands in one invertible batch.

use thiserror::Error;

use crate::document::Document;
use crate::error::ModelError;
use crate::node::{Attributes, Node};
use crate::operation::Operation;
use crate::position::Position;
use crate::range::Range;
use crate::writer::Writer;

/// Errors raised by [`delete_contents`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposerError {
    #[error("selection has no ranges")]
    EmptySelection,
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Knobs for [`delete_contents`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteOptions {
    /// Merge the boundary elements after removing the covered content.
    ///
    /// Off by default: deleting `<p>fo[o</p><p>b]ar</p>` leaves two
    /// paragraphs; with `merge` they become one.
    pub merge: bool,
}

/// Delete everything the current selection covers.
///
/// Each range is flattened into minimal flat subranges which are removed
/// back to front, so earlier subranges keep their paths; multiple ranges
/// are processed in reverse document order for the same reason.  Afterwards
/// the selection collapses to the start of the first range and the caret's
/// pending attributes are inherited from the neighboring text.
///
/// A selection of carets only is a no-op; a selection with no ranges at
/// all is an error.
pub fn delete_contents(writer: &mut Writer<'_>, options: DeleteOptions) -> Result<(), ComposerError> {
    let ranges = writer.document().selection().ranges().to_vec();
    if ranges.is_empty() {
        return Err(ComposerError::EmptySelection);
    }
    if ranges.iter().all(Range::is_collapsed) {
        return Ok(());
    }

    let caret = ranges[0].start().clone();
    for range in ranges.iter().rev() {
        if range.is_collapsed() {
            continue;
        }
        delete_range(writer, range, options.merge)?;
    }
    writer.collapse_selection_to(caret.clone());
    inherit_caret_attributes(writer, &caret)?;
    Ok(())
}

fn delete_range(writer: &mut Writer<'_>, range: &Range, merge: bool) -> Result<(), ComposerError> {
    let flat = range.minimal_flat_ranges(writer.document())?;
    let mut end = range.end().clone();
    for sub in flat.iter().rev() {
        writer.push(Operation::Remove { range: sub.clone() })?;
        end = end
            .transformed_by_deletion(sub)
            .unwrap_or_else(|| sub.start().clone());
    }
    if merge {
        merge_branches(writer, range.start().clone(), end)?;
    }
    Ok(())
}

/// Merge the element chains left open at the two boundaries.
///
/// The positions climb toward each other one level per step: the deeper
/// side ascends past its wrapper, and at equal depth the right element is
/// moved next to the left one (when not already adjacent) and the two are
/// merged.  Stops when both positions land in the same element or either
/// side reaches the root.
fn merge_branches(
    writer: &mut Writer<'_>,
    mut start: Position,
    mut end: Position,
) -> Result<(), ComposerError> {
    loop {
        if start.path().len() < 2 || end.path().len() < 2 {
            return Ok(());
        }
        if start.parent_path() == end.parent_path() {
            return Ok(());
        }
        if start.path().len() > end.path().len() {
            let Some(up) = start.after_parent() else {
                return Ok(());
            };
            start = up;
            continue;
        }
        if end.path().len() > start.path().len() {
            let Some(up) = end.before_parent() else {
                return Ok(());
            };
            end = up;
            continue;
        }
        let (Some(after_left), Some(before_right)) = (start.after_parent(), end.before_parent())
        else {
            return Ok(());
        };
        if before_right != after_left {
            writer.move_range(
                Range::new(before_right.clone(), before_right.shifted(1)),
                after_left.clone(),
            )?;
        }
        writer.merge(after_left.clone())?;
        start = after_left;
        end = before_right;
    }
}

/// Re-derive the caret's pending attributes from its text neighbors: the
/// character before the caret wins, then the character after it, then the
/// attributes clear.  Only actual differences are recorded as operations.
fn inherit_caret_attributes(
    writer: &mut Writer<'_>,
    caret: &Position,
) -> Result<(), ComposerError> {
    let desired = text_attrs_around(writer.document(), caret)?;
    let current = writer.document().selection().attributes().clone();
    for (key, value) in &desired {
        if current.get(key) != Some(value) {
            writer.set_selection_attribute(key, value.clone())?;
        }
    }
    for key in current.keys() {
        if !desired.contains_key(key) {
            writer.remove_selection_attribute(key)?;
        }
    }
    Ok(())
}

fn text_attrs_around(doc: &Document, caret: &Position) -> Result<Attributes, ModelError> {
    let parent = doc.element_at(caret.parent_path())?;
    let offset = caret.offset();
    if offset > 0 {
        if let Some((idx, _)) = parent.child_at_offset(offset - 1) {
            if let Node::Text(t) = &parent.children()[idx] {
                return Ok(t.attrs().clone());
            }
        }
    }
    if let Some((idx, _)) = parent.child_at_offset(offset) {
        if let Node::Text(t) = &parent.children()[idx] {
            return Ok(t.attrs().clone());
        }
    }
    Ok(Attributes::new())
}

// ── Tests ─────────────────────────────────────────────────────────────────
