//! The document: root element, schema, and selection under one owner.

use crate::error::ModelError;
use crate::node::{Element, Node, ROOT_ITEM};
use crate::schema::Schema;
use crate::selection::Selection;

/// The document: a `$root` element, the schema it is validated against,
/// and the current selection.
///
/// The root is held directly (not wrapped in a [`Node`]), so no operation
/// can remove it or merge it away.  All mutation goes through the
/// [`Writer`](crate::writer::Writer); the document itself only resolves
/// paths.
#[derive(Debug)]
pub struct Document {
    pub(crate) root: Element,
    pub(crate) schema: Schema,
    pub(crate) selection: Selection,
}

impl Document {
    pub fn new() -> Self {
        Self {
            root: Element::new(ROOT_ITEM),
            schema: Schema::new(),
            selection: Selection::new(),
        }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn schema_mut(&mut self) -> &mut Schema {
        &mut self.schema
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Resolve an offset path to the element it designates.
    ///
    /// Every component must land exactly on an element child's boundary;
    /// an empty path resolves to the root.
    pub fn element_at(&self, path: &[usize]) -> Result<&Element, ModelError> {
        let mut cur = &self.root;
        for &offset in path {
            let (idx, start) = cur
                .child_at_offset(offset)
                .ok_or_else(|| ModelError::InvalidPosition(path.to_vec()))?;
            match &cur.children()[idx] {
                Node::Element(el) if start == offset => cur = el,
                _ => return Err(ModelError::InvalidPosition(path.to_vec())),
            }
        }
        Ok(cur)
    }

    pub(crate) fn element_at_mut(&mut self, path: &[usize]) -> Result<&mut Element, ModelError> {
        let mut cur = &mut self.root;
        for &offset in path {
            let (idx, start) = cur
                .child_at_offset(offset)
                .ok_or_else(|| ModelError::InvalidPosition(path.to_vec()))?;
            match &mut cur.children[idx] {
                Node::Element(el) if start == offset => cur = el,
                _ => return Err(ModelError::InvalidPosition(path.to_vec())),
            }
        }
        Ok(cur)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
