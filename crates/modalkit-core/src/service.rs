//! The modal lifecycle orchestrator.
//!
//! [`ModalService`] owns the view stack and sequences every open and close
//! through three phases: mutate the stack and call `render`, animate, then
//! notify. Each phase settles before the next begins. Hook failures reject
//! the operation without rolling anything back, so a view whose animation
//! failed stays on the stack.
//!
//! # Example
//!
//! ```rust,no_run
//! use modalkit_core::{ModalOptions, ModalService, NoopRenderer, View};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = ModalService::builder(Arc::new(NoopRenderer)).build();
//!
//!     let view = View::new("settings panel");
//!     service.open(view.clone(), ModalOptions::default()).await?;
//!     assert!(service.is_open());
//!
//!     service.close(Some(view), ModalOptions::default()).await?;
//!     Ok(())
//! }
//! ```

use crate::bus::{ModalBus, ModalEvent};
use crate::config::ModalConfig;
use crate::dialog::DialogViews;
use crate::error::{ModalError, ModalResult};
use crate::navigation::{self, Navigation};
use crate::options::ModalOptions;
use crate::renderer::{HookKind, HookResult, ModalRenderer};
use crate::stack::ViewStack;
use crate::view::View;
use futures::future::try_join_all;
use modalkit_util::modal_span;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn, Instrument};

/// Mutable state shared by all operations.
#[derive(Debug, Default)]
struct ModalState {
    stack: ViewStack,
    /// Set when an open starts, cleared when any close starts.
    open: bool,
    /// Navigation fragment recorded by the latest open.
    fragment: Option<String>,
}

/// Orchestrates the modal stack.
pub struct ModalService {
    config: ModalConfig,
    renderer: Arc<dyn ModalRenderer>,
    pub(crate) dialogs: Option<Arc<dyn DialogViews>>,
    navigation: Option<Arc<dyn Navigation>>,
    pub(crate) bus: ModalBus,
    /// Held only for synchronous mutation steps, never across an await.
    state: Mutex<ModalState>,
    /// Held for a whole open/close when operations are serialized.
    gate: tokio::sync::Mutex<()>,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

/// Builder for [`ModalService`].
pub struct ModalServiceBuilder {
    config: ModalConfig,
    renderer: Arc<dyn ModalRenderer>,
    dialogs: Option<Arc<dyn DialogViews>>,
    navigation: Option<Arc<dyn Navigation>>,
}

impl ModalServiceBuilder {
    pub fn new(renderer: Arc<dyn ModalRenderer>) -> Self {
        Self {
            config: ModalConfig::default(),
            renderer,
            dialogs: None,
            navigation: None,
        }
    }

    pub fn config(mut self, config: ModalConfig) -> Self {
        self.config = config;
        self
    }

    /// Factories for the alert/confirm/prompt views.
    pub fn dialogs(mut self, dialogs: Arc<dyn DialogViews>) -> Self {
        self.dialogs = Some(dialogs);
        self
    }

    /// Navigation subsystem used for location fingerprints and auto-close.
    pub fn navigation(mut self, navigation: Arc<dyn Navigation>) -> Self {
        self.navigation = Some(navigation);
        self
    }

    /// Build the service.
    ///
    /// # Panics
    ///
    /// Panics outside a Tokio runtime when a navigation subsystem is set and
    /// `close_on_navigate` is enabled, since the route watcher is spawned here.
    pub fn build(self) -> Arc<ModalService> {
        let watch = match &self.navigation {
            Some(navigation) if self.config.close_on_navigate => {
                Some((navigation.clone(), navigation.subscribe()))
            }
            _ => None,
        };

        let service = Arc::new(ModalService {
            bus: ModalBus::new(self.config.event_capacity),
            config: self.config,
            renderer: self.renderer,
            dialogs: self.dialogs,
            navigation: self.navigation,
            state: Mutex::new(ModalState::default()),
            gate: tokio::sync::Mutex::new(()),
            watcher: Mutex::new(None),
        });

        if let Some((navigation, routes)) = watch {
            let handle = navigation::spawn_watcher(Arc::downgrade(&service), navigation, routes);
            *service.watcher.lock().unwrap_or_else(|e| e.into_inner()) = Some(handle);
        }

        debug!(
            serialize = service.config.serialize_operations,
            watching = service.navigation.is_some() && service.config.close_on_navigate,
            "Modal service created"
        );
        service
    }
}

impl ModalService {
    pub fn builder(renderer: Arc<dyn ModalRenderer>) -> ModalServiceBuilder {
        ModalServiceBuilder::new(renderer)
    }

    /// Show `view` on top of the stack.
    ///
    /// Emits `before:open`, pushes the view, renders it, then either swaps
    /// it in over the previous top or animates it in, and finally emits
    /// `open`.
    pub async fn open(&self, view: View, options: ModalOptions) -> ModalResult<()> {
        let span = modal_span!("open", view);
        self.open_view(view, options).instrument(span).await
    }

    async fn open_view(&self, view: View, options: ModalOptions) -> ModalResult<()> {
        let _gate = self.enter().await;

        self.bus.emit(ModalEvent::BeforeOpen {
            view: view.clone(),
            options: options.clone(),
        });

        let fragment = self.navigation.as_ref().and_then(|n| n.fragment());
        let previous = {
            let mut state = self.state();
            state.fragment = fragment;
            state.open = true;
            let previous = state.stack.top().cloned();
            state.stack.push(view.clone());
            previous
        };
        debug!(previous = ?previous.as_ref().map(View::id), "Opening modal");

        self.run_hook(HookKind::Render, self.renderer.render(&view, &options))
            .await?;

        match &previous {
            Some(previous) => {
                self.run_hook(
                    HookKind::AnimateSwap,
                    self.renderer.animate_swap(previous, &view, &options),
                )
                .await?
            }
            None => {
                self.run_hook(HookKind::AnimateIn, self.renderer.animate_in(&view, &options))
                    .await?
            }
        }

        self.bus.emit(ModalEvent::Open { view, options });
        Ok(())
    }

    /// Close `view`, or every open view when `None`.
    ///
    /// A targeted close swaps back to the view underneath, or animates out
    /// when it was the last one. Closing everything animates out only the
    /// top view and removes all of them concurrently.
    pub async fn close(&self, view: Option<View>, options: ModalOptions) -> ModalResult<()> {
        match view {
            Some(view) => {
                let span = modal_span!("close", view);
                self.close_view(view, options).instrument(span).await
            }
            None => {
                let span = tracing::debug_span!("modal", op = "close_all");
                self.close_all(options).instrument(span).await
            }
        }
    }

    async fn close_view(&self, view: View, options: ModalOptions) -> ModalResult<()> {
        let _gate = self.enter().await;

        self.bus.emit(ModalEvent::BeforeClose {
            view: view.clone(),
            options: options.clone(),
        });

        let previous = {
            let mut state = self.state();
            state.open = false;
            if !state.stack.remove(&view) {
                debug!("Closing a view that is not on the stack");
            }
            state.stack.top().cloned()
        };

        match &previous {
            Some(previous) => {
                self.run_hook(
                    HookKind::AnimateSwap,
                    self.renderer.animate_swap(&view, previous, &options),
                )
                .await?
            }
            None => {
                self.run_hook(HookKind::AnimateOut, self.renderer.animate_out(&view, &options))
                    .await?
            }
        }

        self.run_hook(HookKind::Remove, self.renderer.remove(&view, &options))
            .await?;

        self.bus.emit(ModalEvent::Close { view, options });
        Ok(())
    }

    async fn close_all(&self, options: ModalOptions) -> ModalResult<()> {
        let _gate = self.enter().await;

        let views = {
            let mut state = self.state();
            for view in state.stack.iter() {
                self.bus.emit(ModalEvent::BeforeClose {
                    view: view.clone(),
                    options: options.clone(),
                });
            }
            state.open = false;
            state.stack.take_all()
        };
        debug!(count = views.len(), "Closing all modals");

        if let Some(last) = views.last() {
            self.run_hook(HookKind::AnimateOut, self.renderer.animate_out(last, &options))
                .await?;
        }

        try_join_all(
            views
                .iter()
                .map(|view| self.run_hook(HookKind::Remove, self.renderer.remove(view, &options))),
        )
        .await?;

        for view in views {
            self.bus.emit(ModalEvent::Close {
                view,
                options: options.clone(),
            });
        }
        Ok(())
    }

    /// Whether a modal is open.
    ///
    /// Cleared by the start of any close, including a targeted close that
    /// leaves other views on the stack.
    pub fn is_open(&self) -> bool {
        self.state().open
    }

    /// Open views, bottom to top.
    pub fn views(&self) -> Vec<View> {
        self.state().stack.to_vec()
    }

    /// The topmost view.
    pub fn current(&self) -> Option<View> {
        self.state().stack.top().cloned()
    }

    /// Fragment recorded by the latest open, if not yet cleared by a route
    /// change.
    pub fn location_fingerprint(&self) -> Option<String> {
        self.state().fragment.clone()
    }

    pub fn config(&self) -> &ModalConfig {
        &self.config
    }

    pub fn bus(&self) -> &ModalBus {
        &self.bus
    }

    /// Subscribe to lifecycle and dialog events.
    pub fn subscribe(&self) -> broadcast::Receiver<ModalEvent> {
        self.bus.subscribe()
    }

    /// Clear the fingerprint if `current` differs from it.
    ///
    /// Returns true when the caller should close everything.
    pub(crate) fn take_stale_fingerprint(&self, current: Option<&str>) -> bool {
        let mut state = self.state();
        if state.fragment.as_deref() == current {
            return false;
        }
        state.fragment = None;
        true
    }

    fn state(&self) -> MutexGuard<'_, ModalState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn enter(&self) -> Option<tokio::sync::MutexGuard<'_, ()>> {
        if self.config.serialize_operations {
            Some(self.gate.lock().await)
        } else {
            None
        }
    }

    async fn run_hook(
        &self,
        hook: HookKind,
        call: impl Future<Output = HookResult>,
    ) -> ModalResult<()> {
        debug!(hook = hook.as_str(), "Running hook");
        call.await.map_err(|source| {
            warn!(hook = hook.as_str(), error = %source, "Modal hook failed");
            ModalError::Hook { hook, source }
        })
    }
}

impl Drop for ModalService {
    fn drop(&mut self) {
        if let Some(handle) = self
            .watcher
            .get_mut()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::NoopRenderer;

    fn service() -> Arc<ModalService> {
        ModalService::builder(Arc::new(NoopRenderer)).build()
    }

    #[tokio::test]
    async fn test_open_pushes_and_sets_flag() {
        let service = service();
        let view = View::new("a");

        service
            .open(view.clone(), ModalOptions::default())
            .await
            .unwrap();

        assert!(service.is_open());
        assert_eq!(service.current(), Some(view));
    }

    #[tokio::test]
    async fn test_close_unknown_view_still_notifies() {
        let service = service();
        let mut rx = service.subscribe();
        let stray = View::new("stray");

        service
            .close(Some(stray.clone()), ModalOptions::default())
            .await
            .unwrap();

        assert_eq!(rx.recv().await.unwrap().name(), "before:close");
        let closed = rx.recv().await.unwrap();
        assert_eq!(closed.name(), "close");
        assert_eq!(closed.view(), &stray);
    }

    #[tokio::test]
    async fn test_close_all_on_empty_stack_is_silent() {
        let service = service();
        let mut rx = service.subscribe();

        service.close(None, ModalOptions::default()).await.unwrap();

        assert!(rx.try_recv().is_err());
        assert!(!service.is_open());
    }

    #[test]
    fn test_fingerprint_staleness() {
        let service = service();
        service.state().fragment = Some("inbox".to_string());

        assert!(!service.take_stale_fingerprint(Some("inbox")));
        assert_eq!(service.location_fingerprint().as_deref(), Some("inbox"));

        assert!(service.take_stale_fingerprint(Some("settings")));
        assert_eq!(service.location_fingerprint(), None);
    }

    #[test]
    fn test_build_without_navigation_needs_no_runtime() {
        let service = service();
        assert!(service.watcher.lock().unwrap().is_none());
        assert!(service.views().is_empty());
    }
}
