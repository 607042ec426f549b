//! Bracket markup for documents: `set_data` / `get_data`.
//!
//! A compact textual form of a document plus its selection, used by tests
//! and debugging:
//!
//! ```text
//! <paragraph>fo[o</paragraph><paragraph align="right">b]ar</paragraph>
//! ```
//!
//! Elements are written as tags, text attributes as a `<$text ...>` span,
//! and selection boundaries as `[` and `]`.  Attribute values parse as JSON
//! where possible and fall back to plain strings, so `bold="true"` is a
//! boolean and `align="right"` a string.
//!
//! When serializing, a boundary that falls on the edge of an attributed
//! text run renders inside the `<$text>` span exactly when the selection's
//! pending attributes equal the run's attributes; that makes the pending
//! formatting of a caret visible in the output.

use std::iter::Peekable;
use std::vec;

use serde_json::Value;
use thiserror::Error;

use crate::document::Document;
use crate::error::ModelError;
use crate::node::{Attributes, Element, Node, Text, ROOT_ITEM, TEXT_ITEM};
use crate::position::Position;
use crate::range::Range;
use crate::selection::Selection;

/// Errors raised while parsing bracket markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("malformed tag <{0}>")]
    BadTag(String),
    #[error("tag is not terminated before the end of input")]
    UnterminatedTag,
    #[error("tag <{0}> is never closed")]
    UnclosedElement(String),
    #[error("closing tag </{0}> does not match the open tag")]
    UnexpectedClose(String),
    #[error("text attribute spans cannot nest")]
    NestedTextAttributes,
    #[error("element opened inside a text attribute span")]
    ElementInsideText,
    #[error("selection brackets are unbalanced")]
    UnmatchedSelection,
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Selection details `set_data` cannot read off the brackets alone.
#[derive(Debug, Clone, Default)]
pub struct SetDataOptions {
    /// Mark the last range backward (focus before anchor).
    pub last_range_backward: bool,
    /// Pending selection attributes to install.
    pub selection_attributes: Attributes,
}

/// Replace the document content and selection with parsed markup.
///
/// Without brackets the selection collapses to the document start.
pub fn set_data(doc: &mut Document, data: &str) -> Result<(), DataError> {
    set_data_with_options(doc, data, SetDataOptions::default())
}

pub fn set_data_with_options(
    doc: &mut Document,
    data: &str,
    options: SetDataOptions,
) -> Result<(), DataError> {
    let mut root = Element::new(ROOT_ITEM);
    let mut stack: Vec<Element> = Vec::new();
    let mut path: Vec<usize> = Vec::new();
    let mut text_attrs: Option<Attributes> = None;
    let mut boundaries: Vec<Position> = Vec::new();
    let mut chars = data.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '<' => {
                let mut tag = String::new();
                loop {
                    match chars.next() {
                        Some('>') => break,
                        Some(c) => tag.push(c),
                        None => return Err(DataError::UnterminatedTag),
                    }
                }
                if let Some(name) = tag.strip_prefix('/') {
                    if name == TEXT_ITEM {
                        if text_attrs.take().is_none() {
                            return Err(DataError::UnexpectedClose(name.to_owned()));
                        }
                    } else {
                        let mut el = stack
                            .pop()
                            .ok_or_else(|| DataError::UnexpectedClose(name.to_owned()))?;
                        if el.name() != name {
                            return Err(DataError::UnexpectedClose(name.to_owned()));
                        }
                        el.normalize_text();
                        path.pop();
                        top(&mut root, &mut stack).children.push(Node::Element(el));
                    }
                } else {
                    let (name, attrs) = parse_tag(&tag)?;
                    if name == TEXT_ITEM {
                        if text_attrs.is_some() {
                            return Err(DataError::NestedTextAttributes);
                        }
                        text_attrs = Some(attrs);
                    } else {
                        if text_attrs.is_some() {
                            return Err(DataError::ElementInsideText);
                        }
                        path.push(top(&mut root, &mut stack).max_offset());
                        stack.push(Element::with_attrs(name, attrs));
                    }
                }
            }
            '[' | ']' => {
                let offset = top(&mut root, &mut stack).max_offset();
                let mut p = path.clone();
                p.push(offset);
                boundaries.push(Position::new(p));
            }
            c => {
                let attrs = text_attrs.clone().unwrap_or_default();
                top(&mut root, &mut stack)
                    .children
                    .push(Node::Text(Text::new(c.to_string(), attrs)));
            }
        }
    }

    if let Some(el) = stack.pop() {
        return Err(DataError::UnclosedElement(el.name().to_owned()));
    }
    if text_attrs.is_some() {
        return Err(DataError::UnclosedElement(TEXT_ITEM.to_owned()));
    }
    if boundaries.len() % 2 != 0 {
        return Err(DataError::UnmatchedSelection);
    }
    root.normalize_text();

    let mut selection = Selection::new();
    if boundaries.is_empty() {
        selection.collapse_to(Position::document_start());
    } else {
        let ranges = boundaries
            .chunks(2)
            .map(|pair| Range::new(pair[0].clone(), pair[1].clone()))
            .collect();
        selection.set_ranges(ranges, options.last_range_backward)?;
    }
    selection.set_attributes(options.selection_attributes);

    doc.root = root;
    doc.selection = selection;
    Ok(())
}

fn top<'a>(root: &'a mut Element, stack: &'a mut Vec<Element>) -> &'a mut Element {
    match stack.last_mut() {
        Some(el) => el,
        None => root,
    }
}

fn parse_tag(tag: &str) -> Result<(String, Attributes), DataError> {
    let trimmed = tag.trim();
    let name_end = trimmed
        .find(char::is_whitespace)
        .unwrap_or(trimmed.len());
    let name = trimmed[..name_end].to_owned();
    if name.is_empty() {
        return Err(DataError::BadTag(tag.to_owned()));
    }
    let mut rest = trimmed[name_end..].trim_start();
    let mut attrs = Attributes::new();
    while !rest.is_empty() {
        let eq = rest.find('=').ok_or_else(|| DataError::BadTag(tag.to_owned()))?;
        let key = rest[..eq].trim_end().to_owned();
        let after = rest[eq + 1..]
            .strip_prefix('"')
            .ok_or_else(|| DataError::BadTag(tag.to_owned()))?;
        let close = after
            .find('"')
            .ok_or_else(|| DataError::BadTag(tag.to_owned()))?;
        let raw = &after[..close];
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
        attrs.insert(key, value);
        rest = after[close + 1..].trim_start();
    }
    Ok((name, attrs))
}

// ── Serialization ─────────────────────────────────────────────────────────

type MarkerQueue = Peekable<vec::IntoIter<(Position, char)>>;

/// Serialize the document content and selection back to bracket markup.
pub fn get_data(doc: &Document) -> String {
    let sel = doc.selection();
    let mut markers: Vec<(Position, char)> = Vec::new();
    for range in sel.ranges() {
        markers.push((range.start().clone(), '['));
        markers.push((range.end().clone(), ']'));
    }
    // stable, so a collapsed range stays `[]` and adjacent ranges stay `][`
    markers.sort_by(|a, b| a.0.cmp(&b.0));
    let mut queue = markers.into_iter().peekable();
    let mut out = String::new();
    let mut path = Vec::new();
    write_children(doc.root(), &mut path, &mut queue, sel.attributes(), &mut out);
    out
}

fn flush_at(queue: &mut MarkerQueue, path: &[usize], offset: usize, out: &mut String) {
    while matches!(queue.peek(), Some((p, _)) if p.parent_path() == path && p.offset() == offset) {
        if let Some((_, c)) = queue.next() {
            out.push(c);
        }
    }
}

fn write_children(
    el: &Element,
    path: &mut Vec<usize>,
    queue: &mut MarkerQueue,
    sel_attrs: &Attributes,
    out: &mut String,
) {
    let mut offset = 0;
    for child in el.children() {
        match child {
            Node::Element(e) => {
                flush_at(queue, path, offset, out);
                out.push('<');
                out.push_str(e.name());
                write_attrs(e.attrs(), out);
                out.push('>');
                path.push(offset);
                write_children(e, path, queue, sel_attrs, out);
                path.pop();
                out.push_str("</");
                out.push_str(e.name());
                out.push('>');
                offset += 1;
            }
            Node::Text(t) => {
                let wrap = !t.attrs().is_empty();
                let inside = wrap && sel_attrs == t.attrs();
                if wrap && !inside {
                    flush_at(queue, path, offset, out);
                }
                if wrap {
                    out.push('<');
                    out.push_str(TEXT_ITEM);
                    write_attrs(t.attrs(), out);
                    out.push('>');
                }
                if !wrap || inside {
                    flush_at(queue, path, offset, out);
                }
                let len = t.len();
                for (i, ch) in t.data().chars().enumerate() {
                    out.push(ch);
                    if i + 1 < len {
                        flush_at(queue, path, offset + i + 1, out);
                    }
                }
                offset += len;
                // boundary markers at the trailing edge stay inside the span
                // only when the pending attributes match; otherwise they are
                // left for the next sibling (or the final flush below)
                if inside {
                    flush_at(queue, path, offset, out);
                }
                if wrap {
                    out.push_str("</");
                    out.push_str(TEXT_ITEM);
                    out.push('>');
                }
            }
        }
    }
    flush_at(queue, path, offset, out);
}

fn write_attrs(attrs: &Attributes, out: &mut String) {
    for (key, value) in attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        match value {
            Value::String(s) => out.push_str(s),
            other => out.push_str(&other.to_string()),
        }
        out.push('"');
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
