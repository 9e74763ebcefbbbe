//! Ordered stack of open views.
//!
//! # Invariants
//!
//! - Insertion order is open order; the last element is the current view.
//! - Duplicates are kept as pushed.
//! - [`ViewStack::remove`] drops every occurrence of a view and keeps the
//!   relative order of the rest.

use crate::view::View;

/// The views currently open, bottom to top.
#[derive(Debug, Clone, Default)]
pub struct ViewStack {
    views: Vec<View>,
}

impl ViewStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a view on top.
    pub fn push(&mut self, view: View) {
        self.views.push(view);
    }

    /// The topmost view.
    pub fn top(&self) -> Option<&View> {
        self.views.last()
    }

    /// Remove a view by identity. Returns true if anything was removed.
    pub fn remove(&mut self, view: &View) -> bool {
        let before = self.views.len();
        self.views.retain(|v| !v.same(view));
        self.views.len() != before
    }

    /// Empty the stack, returning its former contents bottom to top.
    pub fn take_all(&mut self) -> Vec<View> {
        std::mem::take(&mut self.views)
    }

    pub fn contains(&self, view: &View) -> bool {
        self.views.iter().any(|v| v.same(view))
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &View> {
        self.views.iter()
    }

    /// Snapshot of the stack, bottom to top.
    pub fn to_vec(&self) -> Vec<View> {
        self.views.clone()
    }
}
