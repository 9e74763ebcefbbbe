//! Opaque handles to dialog widgets.
//!
//! The orchestrator never looks inside a [`View`]: it hands it to the
//! renderer hooks and compares handles by identity. Hooks that need the
//! actual widget downcast it with [`View::widget`].

use modalkit_util::Identifier;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A cheaply clonable handle to a dialog widget.
///
/// Clones share the same identity; two separately created handles are never
/// equal, even when they wrap equal widgets.
#[derive(Clone)]
pub struct View {
    id: Arc<str>,
    widget: Arc<dyn Any + Send + Sync>,
}

impl View {
    /// Wrap a widget in a new handle with a fresh identity.
    pub fn new<W: Any + Send + Sync>(widget: W) -> Self {
        Self {
            id: Identifier::view().into(),
            widget: Arc::new(widget),
        }
    }

    /// Handle identity (`view_<ulid>`).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Borrow the wrapped widget as `W`, if that is its type.
    pub fn widget<W: Any>(&self) -> Option<&W> {
        self.widget.downcast_ref::<W>()
    }

    /// Whether two handles refer to the same view.
    pub fn same(&self, other: &View) -> bool {
        Arc::ptr_eq(&self.id, &other.id)
    }
}

impl PartialEq for View {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for View {}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("View").field(&self.id).finish()
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
