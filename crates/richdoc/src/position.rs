//! Positions: exclusive locations between nodes, addressed as offset paths.
//!
//! A position never stores a live node reference.  It is a path of offsets
//! from the document root, re-resolved against the tree on every use, so it
//! cannot dangle after a removal.  Each path component is an offset in the
//! corresponding element's offset space (see [`crate::node`]); the last
//! component may point between the characters of a text run.
//!
//! Document order over positions is the lexicographic order of their paths.

use crate::range::Range;

/// A location between nodes, as a path of offsets from the root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    path: Vec<usize>,
}

impl Position {
    /// Position from a raw offset path.  An empty path is not a position;
    /// the document start is `[0]`.
    pub fn new(path: Vec<usize>) -> Self {
        debug_assert!(!path.is_empty(), "a position path has at least one offset");
        Self { path }
    }

    /// Caret at the very start of the document.
    pub fn document_start() -> Self {
        Self { path: vec![0] }
    }

    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Path of the element holding this position.
    pub fn parent_path(&self) -> &[usize] {
        &self.path[..self.path.len() - 1]
    }

    /// Offset inside the holding element.
    pub fn offset(&self) -> usize {
        *self.path.last().expect("non-empty path")
    }

    /// Same parent, offset shifted right by `delta`.
    pub fn shifted(&self, delta: usize) -> Self {
        let mut path = self.path.clone();
        *path.last_mut().expect("non-empty path") += delta;
        Self { path }
    }

    /// Position of the holding element inside *its* parent, or `None` when
    /// the holder is the root.
    pub fn before_parent(&self) -> Option<Self> {
        (self.path.len() > 1).then(|| Self {
            path: self.parent_path().to_vec(),
        })
    }

    /// Position right after the holding element, or `None` when the holder
    /// is the root.
    pub fn after_parent(&self) -> Option<Self> {
        self.before_parent().map(|p| p.shifted(1))
    }

    /// Length of the longest common path prefix with `other`.
    pub fn common_prefix_len(&self, other: &Position) -> usize {
        self.path
            .iter()
            .zip(&other.path)
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// Re-anchor this position after a flat removal.
    ///
    /// Returns `None` when the position was inside the removed content (the
    /// caller collapses it to the removal start).
    pub fn transformed_by_deletion(&self, removed: &Range) -> Option<Position> {
        debug_assert!(removed.is_flat());
        let pp = removed.start().parent_path();
        let i = pp.len();
        if self.path.len() <= i || self.path[..i] != *pp {
            return Some(self.clone());
        }
        let so = removed.start().offset();
        let eo = removed.end().offset();
        let o = self.path[i];
        if o >= eo {
            let mut path = self.path.clone();
            path[i] -= eo - so;
            return Some(Position::new(path));
        }
        let deeper = self.path.len() > i + 1;
        // a boundary offset survives; anything interior was removed
        let inside = if deeper { o >= so } else { o > so };
        if inside {
            None
        } else {
            Some(self.clone())
        }
    }

    /// Re-anchor this position after `size` offsets were inserted at `at`.
    ///
    /// A position exactly at the insertion point stays put (the content
    /// lands after it).
    pub fn transformed_by_insertion(&self, at: &Position, size: usize) -> Position {
        let pp = at.parent_path();
        let i = pp.len();
        if self.path.len() <= i || self.path[..i] != *pp {
            return self.clone();
        }
        let o = self.path[i];
        let a = at.offset();
        let deeper = self.path.len() > i + 1;
        if o > a || (deeper && o == a) {
            let mut path = self.path.clone();
            path[i] += size;
            Position::new(path)
        } else {
            self.clone()
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
