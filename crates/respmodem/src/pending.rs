//! In-progress array replies.
//!
//! Open arrays live in an arena addressed by index, each recording its parent
//! slot. Arrays complete depth-first, so the active (innermost) array is
//! always the last node and completing it pops the arena.

use alloc::vec::Vec;

use crate::value::{Array, Value};

/// Upper bound on elements reserved up front for a declared array length, so
/// a hostile `*2147483647` does not allocate before any element arrives.
const MAX_PREALLOCATED_ELEMENTS: usize = 1024;

#[derive(Debug)]
struct PendingArray {
    expected: usize,
    elements: Array,
    parent: Option<usize>,
    index_in_parent: usize,
}

impl PendingArray {
    fn is_full(&self) -> bool {
        self.elements.len() == self.expected
    }
}

#[derive(Debug, Default)]
pub(crate) struct PendingArrays {
    nodes: Vec<PendingArray>,
    active: Option<usize>,
}

impl PendingArrays {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of open arrays.
    pub(crate) fn depth(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.active.is_none()
    }

    /// Opens a new array of `expected >= 1` elements inside the active one.
    pub(crate) fn open(&mut self, expected: usize) {
        debug_assert!(expected >= 1, "empty arrays never allocate a node");
        let index_in_parent = self.active.map_or(0, |p| self.nodes[p].elements.len());
        self.nodes.push(PendingArray {
            expected,
            elements: Vec::with_capacity(expected.min(MAX_PREALLOCATED_ELEMENTS)),
            parent: self.active,
            index_in_parent,
        });
        self.active = Some(self.nodes.len() - 1);
    }

    /// Completes the current target with `value`.
    ///
    /// Returns the value back when no array is open, or the finished root
    /// array once `value` fills it and every ancestor in turn. Otherwise the
    /// value is retained and `None` is returned.
    pub(crate) fn complete(&mut self, value: Value) -> Option<Value> {
        let Some(mut active) = self.active else {
            return Some(value);
        };
        self.nodes[active].elements.push(value);

        while self.nodes[active].is_full() {
            debug_assert_eq!(active, self.nodes.len() - 1);
            let done = self.nodes.pop()?;
            match done.parent {
                None => {
                    self.active = None;
                    return Some(Value::Array(done.elements));
                }
                Some(parent) => {
                    let siblings = &mut self.nodes[parent].elements;
                    debug_assert_eq!(siblings.len(), done.index_in_parent);
                    siblings.push(Value::Array(done.elements));
                    active = parent;
                    self.active = Some(parent);
                }
            }
        }
        None
    }

    /// Drops every open array.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.active = None;
    }
}
