//! Atomic, invertible tree operations.
//!
//! Every mutation of the document decomposes into the operations here.
//! Applying one returns the operations that undo it, so a [`Batch`] of
//! applied operations can always be rolled back by applying the recorded
//! inverses in reverse batch order.
//!
//! Operations are applied through the [`Writer`](crate::writer::Writer),
//! which owns the batch; nothing else mutates the tree.

use serde_json::Value;

use crate::document::Document;
use crate::error::ModelError;
use crate::node::{Element, Node};
use crate::position::Position;
use crate::range::Range;

/// One atomic document change.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Insert `nodes` at a position; the content lands after it.
    Insert { at: Position, nodes: Vec<Node> },
    /// Remove the content of a flat range.
    Remove { range: Range },
    /// Move the content of a flat range to `target`.
    Move { range: Range, target: Position },
    /// Merge the element before `at` with the element after it.  The right
    /// element's children move to the end of the left one; the right
    /// element is removed and the left identity (name, attributes) wins.
    Merge { at: Position },
    /// Split the element holding `at` in two at that offset.  The clone
    /// keeps the name and attributes and receives the trailing children.
    Split { at: Position },
    /// Set a pending selection attribute.
    SetSelectionAttribute { key: String, value: Value },
    /// Remove a pending selection attribute.
    RemoveSelectionAttribute { key: String },
}

impl Operation {
    /// Apply this operation to the document.
    ///
    /// Returns the inverse operations in the order they must be applied to
    /// undo this one.  Validation happens before any mutation, so a
    /// returned error leaves the document untouched.
    pub fn apply(&self, doc: &mut Document) -> Result<Vec<Operation>, ModelError> {
        match self {
            Operation::Insert { at, nodes } => apply_insert(doc, at, nodes),
            Operation::Remove { range } => apply_remove(doc, range),
            Operation::Move { range, target } => apply_move(doc, range, target),
            Operation::Merge { at } => apply_merge(doc, at),
            Operation::Split { at } => apply_split(doc, at),
            Operation::SetSelectionAttribute { key, value } => {
                let inverse = match doc.selection.set_attribute(key, value.clone()) {
                    Some(old) => Operation::SetSelectionAttribute {
                        key: key.clone(),
                        value: old,
                    },
                    None => Operation::RemoveSelectionAttribute { key: key.clone() },
                };
                Ok(vec![inverse])
            }
            Operation::RemoveSelectionAttribute { key } => {
                Ok(match doc.selection.remove_attribute(key) {
                    Some(old) => vec![Operation::SetSelectionAttribute {
                        key: key.clone(),
                        value: old,
                    }],
                    None => Vec::new(),
                })
            }
        }
    }
}

fn total_size(nodes: &[Node]) -> usize {
    nodes.iter().map(Node::offset_size).sum()
}

fn apply_insert(
    doc: &mut Document,
    at: &Position,
    nodes: &[Node],
) -> Result<Vec<Operation>, ModelError> {
    let parent = doc.element_at(at.parent_path())?;
    let max = parent.max_offset();
    if at.offset() > max {
        return Err(ModelError::OffsetOutOfBounds {
            offset: at.offset(),
            max,
        });
    }
    let parent_name = parent.name().to_owned();
    for node in nodes {
        if !doc.schema().can_contain(&parent_name, node.item_name()) {
            return Err(ModelError::SchemaViolation {
                parent: parent_name.clone(),
                child: node.item_name().to_owned(),
            });
        }
    }
    let size = total_size(nodes);
    let parent = doc.element_at_mut(at.parent_path())?;
    parent.insert_at_offset(at.offset(), nodes.to_vec());
    Ok(vec![Operation::Remove {
        range: Range::new(at.clone(), at.shifted(size)),
    }])
}

fn apply_remove(doc: &mut Document, range: &Range) -> Result<Vec<Operation>, ModelError> {
    if !range.is_flat() {
        return Err(ModelError::NotFlat);
    }
    let parent = doc.element_at_mut(range.start().parent_path())?;
    let max = parent.max_offset();
    if range.end().offset() > max {
        return Err(ModelError::OffsetOutOfBounds {
            offset: range.end().offset(),
            max,
        });
    }
    let nodes = parent.take_slice(range.start().offset(), range.end().offset());
    Ok(vec![Operation::Insert {
        at: range.start().clone(),
        nodes,
    }])
}

fn apply_move(
    doc: &mut Document,
    range: &Range,
    target: &Position,
) -> Result<Vec<Operation>, ModelError> {
    if !range.is_flat() {
        return Err(ModelError::NotFlat);
    }
    // where the target lands once the source content is out
    let new_target = target
        .transformed_by_deletion(range)
        .ok_or(ModelError::MoveTargetInsideSource)?;
    let source = doc.element_at(range.start().parent_path())?;
    let max = source.max_offset();
    if range.end().offset() > max {
        return Err(ModelError::OffsetOutOfBounds {
            offset: range.end().offset(),
            max,
        });
    }
    let names = source.covered_names(range.start().offset(), range.end().offset());
    let dest = doc.element_at(target.parent_path())?;
    let dest_max = dest.max_offset();
    if target.offset() > dest_max {
        return Err(ModelError::OffsetOutOfBounds {
            offset: target.offset(),
            max: dest_max,
        });
    }
    let dest_name = dest.name().to_owned();
    for name in &names {
        if !doc.schema().can_contain(&dest_name, name) {
            return Err(ModelError::SchemaViolation {
                parent: dest_name.clone(),
                child: name.clone(),
            });
        }
    }
    let source = doc.element_at_mut(range.start().parent_path())?;
    let nodes = source.take_slice(range.start().offset(), range.end().offset());
    let size = total_size(&nodes);
    let dest = doc.element_at_mut(new_target.parent_path())?;
    dest.insert_at_offset(new_target.offset(), nodes);
    // the old source start, as seen after the insertion
    let back = range.start().transformed_by_insertion(&new_target, size);
    Ok(vec![Operation::Move {
        range: Range::new(new_target.clone(), new_target.shifted(size)),
        target: back,
    }])
}

fn apply_merge(doc: &mut Document, at: &Position) -> Result<Vec<Operation>, ModelError> {
    let o = at.offset();
    let parent = doc.element_at_mut(at.parent_path())?;
    if o == 0 {
        return Err(ModelError::InvalidMergePosition);
    }
    let (ri, rs) = parent
        .child_at_offset(o)
        .ok_or(ModelError::InvalidMergePosition)?;
    let (li, ls) = parent
        .child_at_offset(o - 1)
        .ok_or(ModelError::InvalidMergePosition)?;
    if rs != o
        || ls != o - 1
        || parent.children[ri].as_element().is_none()
        || parent.children[li].as_element().is_none()
    {
        return Err(ModelError::InvalidMergePosition);
    }
    let Node::Element(right) = parent.children.remove(ri) else {
        unreachable!("checked above")
    };
    let Node::Element(left) = &mut parent.children[li] else {
        unreachable!("checked above")
    };
    let left_max = left.max_offset();
    let moved = right.max_offset();
    let shell = Element::with_attrs(right.name.clone(), right.attrs.clone());
    left.children.extend(right.children);
    left.normalize_text();

    // undo: re-insert an empty right element, then move the seam content
    // (everything past the left element's old size) back into it
    let mut seam_path = at.parent_path().to_vec();
    seam_path.push(o - 1);
    seam_path.push(left_max);
    let seam = Position::new(seam_path);
    let mut into_path = at.parent_path().to_vec();
    into_path.push(o);
    into_path.push(0);
    Ok(vec![
        Operation::Insert {
            at: at.clone(),
            nodes: vec![Node::Element(shell)],
        },
        Operation::Move {
            range: Range::new(seam.clone(), seam.shifted(moved)),
            target: Position::new(into_path),
        },
    ])
}

fn apply_split(doc: &mut Document, at: &Position) -> Result<Vec<Operation>, ModelError> {
    if at.path().len() < 2 {
        return Err(ModelError::CannotSplitRoot);
    }
    let o = at.offset();
    let split_path = at.parent_path();
    let el = doc.element_at_mut(split_path)?;
    let max = el.max_offset();
    if o > max {
        return Err(ModelError::OffsetOutOfBounds { offset: o, max });
    }
    let mut clone = Element::with_attrs(el.name.clone(), el.attrs.clone());
    clone.children = el.take_slice(o, max);
    let parent_offset = split_path[split_path.len() - 1];
    let gp_path = &split_path[..split_path.len() - 1];
    let gp = doc.element_at_mut(gp_path)?;
    gp.insert_at_offset(parent_offset + 1, vec![Node::Element(clone)]);
    let mut merge_path = gp_path.to_vec();
    merge_path.push(parent_offset + 1);
    Ok(vec![Operation::Merge {
        at: Position::new(merge_path),
    }])
}

// ── Batch ─────────────────────────────────────────────────────────────────

/// An operation together with the inverses its application produced.
#[derive(Debug, Clone)]
pub struct AppliedOperation {
    pub op: Operation,
    pub inverse: Vec<Operation>,
}

/// The ordered record of applied operations for one writer session.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    applied: Vec<AppliedOperation>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operations(&self) -> &[AppliedOperation] {
        &self.applied
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    pub(crate) fn record(&mut self, op: Operation, inverse: Vec<Operation>) {
        self.applied.push(AppliedOperation { op, inverse });
    }

    /// The operations that undo this batch, in application order.
    pub fn inverse(&self) -> Vec<Operation> {
        self.applied
            .iter()
            .rev()
            .flat_map(|a| a.inverse.iter().cloned())
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
