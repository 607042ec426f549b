//! Rich-text document model: a tree of elements and text runs, positions
//! addressed as offset paths, an invertible operation layer, and the
//! structural deletion of selected content.
//!
//! The usual flow: build a [`Document`], describe content with
//! [`treetext::set_data`], open a [`Writer`], and call
//! [`delete_contents`]; the writer's [`Batch`] records everything needed
//! to undo the change.

pub mod composer;
pub mod document;
pub mod error;
pub mod node;
pub mod operation;
pub mod position;
pub mod range;
pub mod schema;
pub mod selection;
pub mod treetext;
pub mod writer;

pub use composer::{delete_contents, ComposerError, DeleteOptions};
pub use document::Document;
pub use error::ModelError;
pub use node::{Attributes, Element, Node, Text};
pub use operation::{AppliedOperation, Batch, Operation};
pub use position::Position;
pub use range::Range;
pub use schema::{AllowRule, Schema};
pub use selection::Selection;
pub use writer::Writer;

/// Returns the crate version at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
