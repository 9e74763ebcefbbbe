//! Rendering and animation hooks supplied by the host application.
//!
//! The orchestrator awaits each hook and never looks at how it is done:
//! inserting a widget into a display tree, playing a transition, or
//! nothing at all.

use crate::error::BoxError;
use crate::options::ModalOptions;
use crate::view::View;
use async_trait::async_trait;
use std::fmt;

/// Outcome of a single hook call.
pub type HookResult = Result<(), BoxError>;

/// Host-side rendering collaborator.
///
/// Every hook defaults to a no-op so hosts implement only what they need.
#[async_trait]
pub trait ModalRenderer: Send + Sync {
    /// Put the view on screen (not yet visible to the user).
    async fn render(&self, _view: &View, _options: &ModalOptions) -> HookResult {
        Ok(())
    }

    /// Take the view off screen for good.
    async fn remove(&self, _view: &View, _options: &ModalOptions) -> HookResult {
        Ok(())
    }

    /// Show the first view of an empty stack.
    async fn animate_in(&self, _view: &View, _options: &ModalOptions) -> HookResult {
        Ok(())
    }

    /// Transition from `outgoing` to `incoming`.
    async fn animate_swap(
        &self,
        _outgoing: &View,
        _incoming: &View,
        _options: &ModalOptions,
    ) -> HookResult {
        Ok(())
    }

    /// Hide the last visible view.
    async fn animate_out(&self, _view: &View, _options: &ModalOptions) -> HookResult {
        Ok(())
    }
}

/// Renderer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRenderer;

impl ModalRenderer for NoopRenderer {}

/// Identifies a hook in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    Render,
    Remove,
    AnimateIn,
    AnimateSwap,
    AnimateOut,
}

impl HookKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookKind::Render => "render",
            HookKind::Remove => "remove",
            HookKind::AnimateIn => "animate_in",
            HookKind::AnimateSwap => "animate_swap",
            HookKind::AnimateOut => "animate_out",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
