//! Document tree nodes: elements and text runs.
//!
//! The tree is made of two node kinds: [`Element`] (named container with an
//! attribute map and ordered children) and [`Text`] (a run of characters
//! sharing one attribute map).  The document root is an [`Element`] named
//! `$root` held directly by [`Document`](crate::document::Document), so it
//! can never appear as a child and never be removed or merged away.
//!
//! # Offset space
//!
//! Every node occupies a number of offsets inside its parent: an element
//! takes `1`, a text run takes one offset per character.  An element's
//! interior therefore addresses `0..=max_offset`, and positions can point
//! between any two characters of a text child directly.
//!
//! # Normalization invariant
//!
//! After every mutating operation an element holds no empty text runs and no
//! two adjacent text runs with equal attribute maps.

use indexmap::IndexMap;
use serde_json::Value;

/// Attribute map, insertion-ordered.
///
/// Value equality decides "same formatting": two text runs with equal maps
/// are joined by normalization.
pub type Attributes = IndexMap<String, Value>;

/// Reserved item name for text content in schema rules and serialization.
pub const TEXT_ITEM: &str = "$text";

/// Reserved element name of the document root.
pub const ROOT_ITEM: &str = "$root";

// ── Node ──────────────────────────────────────────────────────────────────

/// A node in the document tree: an element or a text run.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(Text),
}

impl Node {
    /// How many offsets this node occupies in its parent.
    pub fn offset_size(&self) -> usize {
        match self {
            Node::Element(_) => 1,
            Node::Text(t) => t.len(),
        }
    }

    /// Schema item name: the element name, or `$text` for text runs.
    pub fn item_name(&self) -> &str {
        match self {
            Node::Element(el) => &el.name,
            Node::Text(_) => TEXT_ITEM,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Node::Text(t) => Some(t),
            Node::Element(_) => None,
        }
    }
}

// ── Text ──────────────────────────────────────────────────────────────────

/// A run of characters sharing one attribute map.
///
/// Offsets into a run are `char` counts, not bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub(crate) data: String,
    pub(crate) attrs: Attributes,
}

impl Text {
    pub fn new(data: impl Into<String>, attrs: Attributes) -> Self {
        Self {
            data: data.into(),
            attrs,
        }
    }

    pub fn plain(data: impl Into<String>) -> Self {
        Self::new(data, Attributes::new())
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    /// Character count of the run.
    pub fn len(&self) -> usize {
        self.data.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn byte_at(&self, char_idx: usize) -> usize {
        self.data
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.data.len())
    }

    /// Split the run into (prefix, covered, suffix) around `[lo, hi)`.
    ///
    /// Empty prefix/suffix come back as `None`; the covered part keeps the
    /// run's attribute map.
    pub(crate) fn split3(&self, lo: usize, hi: usize) -> (Option<Text>, Text, Option<Text>) {
        let lo_b = self.byte_at(lo);
        let hi_b = self.byte_at(hi);
        let prefix = &self.data[..lo_b];
        let covered = &self.data[lo_b..hi_b];
        let suffix = &self.data[hi_b..];
        (
            (!prefix.is_empty()).then(|| Text::new(prefix, self.attrs.clone())),
            Text::new(covered, self.attrs.clone()),
            (!suffix.is_empty()).then(|| Text::new(suffix, self.attrs.clone())),
        )
    }

    /// Split into (left, right) at a character offset.
    pub(crate) fn split2(&self, at: usize) -> (Text, Text) {
        let b = self.byte_at(at);
        (
            Text::new(&self.data[..b], self.attrs.clone()),
            Text::new(&self.data[b..], self.attrs.clone()),
        )
    }
}

// ── Element ───────────────────────────────────────────────────────────────

/// A named container with an attribute map and ordered children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub(crate) name: String,
    pub(crate) attrs: Attributes,
    pub(crate) children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Attributes::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attrs(name: impl Into<String>, attrs: Attributes) -> Self {
        Self {
            name: name.into(),
            attrs,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Sum of the children's offset sizes; the element's interior addresses
    /// `0..=max_offset`.
    pub fn max_offset(&self) -> usize {
        self.children.iter().map(Node::offset_size).sum()
    }

    /// Child whose span contains `offset`, as `(child_index, child_start)`.
    ///
    /// `None` when `offset` equals `max_offset` (or lies past it).
    pub fn child_at_offset(&self, offset: usize) -> Option<(usize, usize)> {
        let mut start = 0;
        for (i, child) in self.children.iter().enumerate() {
            let end = start + child.offset_size();
            if offset < end {
                return Some((i, start));
            }
            start = end;
        }
        None
    }

    /// Item names of the nodes a `[start, end)` slice would cover, without
    /// mutating.  Partially covered text runs report as `$text`.
    pub(crate) fn covered_names(&self, start: usize, end: usize) -> Vec<String> {
        let mut names = Vec::new();
        let mut offset = 0;
        for child in &self.children {
            let size = child.offset_size();
            let (s, e) = (offset, offset + size);
            offset = e;
            if e <= start || s >= end {
                continue;
            }
            names.push(child.item_name().to_owned());
        }
        names
    }

    /// Remove and return the content covered by `[start, end)`.
    ///
    /// Fully covered nodes move out whole; partially covered text runs are
    /// truncated, with the covered characters captured.  The element is
    /// normalized afterwards.
    pub(crate) fn take_slice(&mut self, start: usize, end: usize) -> Vec<Node> {
        if start >= end {
            return Vec::new();
        }
        let mut kept = Vec::with_capacity(self.children.len());
        let mut taken = Vec::new();
        let mut offset = 0;
        for child in self.children.drain(..) {
            let size = child.offset_size();
            let (s, e) = (offset, offset + size);
            offset = e;
            if e <= start || s >= end {
                kept.push(child);
                continue;
            }
            match child {
                // element size is 1, so any overlap covers it whole
                Node::Element(el) => taken.push(Node::Element(el)),
                Node::Text(t) => {
                    let lo = start.saturating_sub(s);
                    let hi = end.min(e) - s;
                    let (prefix, covered, suffix) = t.split3(lo, hi);
                    if let Some(p) = prefix {
                        kept.push(Node::Text(p));
                    }
                    taken.push(Node::Text(covered));
                    if let Some(sx) = suffix {
                        kept.push(Node::Text(sx));
                    }
                }
            }
        }
        self.children = kept;
        self.normalize_text();
        taken
    }

    /// Insert `nodes` at an interior offset, splitting a text run when the
    /// offset falls inside one.  The element is normalized afterwards.
    pub(crate) fn insert_at_offset(&mut self, offset: usize, nodes: Vec<Node>) {
        let mut acc = 0;
        let mut idx = None;
        for i in 0..self.children.len() {
            if acc == offset {
                idx = Some(i);
                break;
            }
            let size = self.children[i].offset_size();
            if offset < acc + size {
                // mid-run insertion: split the text child in two
                let (left, right) = match &self.children[i] {
                    Node::Text(t) => t.split2(offset - acc),
                    // element children occupy one offset, nothing between
                    Node::Element(_) => unreachable!("offset inside an element child"),
                };
                self.children[i] = Node::Text(left);
                self.children.insert(i + 1, Node::Text(right));
                idx = Some(i + 1);
                break;
            }
            acc += size;
        }
        let idx = idx.unwrap_or(self.children.len());
        self.children.splice(idx..idx, nodes);
        self.normalize_text();
    }

    /// Restore the normalization invariant: drop empty runs, join adjacent
    /// runs with equal attribute maps.
    pub(crate) fn normalize_text(&mut self) {
        let mut merged: Vec<Node> = Vec::with_capacity(self.children.len());
        for child in self.children.drain(..) {
            match child {
                Node::Text(t) if t.is_empty() => continue,
                Node::Text(t) => match merged.last_mut() {
                    Some(Node::Text(prev)) if prev.attrs == t.attrs => {
                        prev.data.push_str(&t.data);
                    }
                    _ => merged.push(Node::Text(t)),
                },
                other => merged.push(other),
            }
        }
        self.children = merged;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
