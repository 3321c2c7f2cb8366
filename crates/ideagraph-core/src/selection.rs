//! # Selection
//!
//! The set of selected node ids.
//!
//! Render code memoizes on the identity of the selection set, so this type
//! never hands out a fresh empty set: every empty selection is the same
//! process-wide `Arc`, and operations that change nothing keep the current
//! `Arc` untouched.

use crate::NodeId;
use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};

/// Shared set of selected ids.
pub type SelectionSet = Arc<BTreeSet<NodeId>>;

/// The one empty selection.
fn empty_set() -> SelectionSet {
    static EMPTY: OnceLock<SelectionSet> = OnceLock::new();
    Arc::clone(EMPTY.get_or_init(|| Arc::new(BTreeSet::new())))
}

#[derive(Debug, Clone)]
pub struct Selection {
    ids: SelectionSet,
}

impl Default for Selection {
    fn default() -> Self {
        Self { ids: empty_set() }
    }
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the current set.
    #[must_use]
    pub fn ids(&self) -> SelectionSet {
        Arc::clone(&self.ids)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.ids.iter()
    }

    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Add `id`. No-op if already selected.
    pub fn select(&mut self, id: NodeId) -> bool {
        if self.ids.contains(&id) {
            return false;
        }
        let mut next = (*self.ids).clone();
        next.insert(id);
        self.ids = Arc::new(next);
        true
    }

    /// Remove `id`. No-op if not selected.
    pub fn deselect(&mut self, id: &NodeId) -> bool {
        if !self.ids.contains(id) {
            return false;
        }
        let mut next = (*self.ids).clone();
        next.remove(id);
        self.ids = if next.is_empty() {
            empty_set()
        } else {
            Arc::new(next)
        };
        true
    }

    /// Empty the selection. An already-empty selection keeps its `Arc`.
    pub fn clear(&mut self) -> bool {
        if self.ids.is_empty() {
            return false;
        }
        self.ids = empty_set();
        true
    }

    /// Replace the whole selection.
    pub fn replace(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        let next: BTreeSet<NodeId> = ids.into_iter().collect();
        if next == *self.ids {
            return;
        }
        self.ids = if next.is_empty() {
            empty_set()
        } else {
            Arc::new(next)
        };
    }

    /// Keep only ids accepted by `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&NodeId) -> bool) -> bool {
        if self.ids.iter().all(&mut keep) {
            return false;
        }
        let next: BTreeSet<NodeId> = self.ids.iter().filter(|&id| keep(id)).cloned().collect();
        self.ids = if next.is_empty() {
            empty_set()
        } else {
            Arc::new(next)
        };
        true
    }
}

// =============================================================================
// TESTS
// =============================================================================
