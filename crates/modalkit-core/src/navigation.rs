//! Navigation collaborator and the route-change watcher.
//!
//! The service only needs two things from the host's history subsystem:
//! the current fragment and a stream of change notifications. When a
//! notification arrives and the fragment differs from the one recorded by
//! the latest `open`, every open view is closed.

use crate::options::ModalOptions;
use crate::service::ModalService;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock, Weak};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Route change notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteChanged {
    /// Fragment after the change.
    pub fragment: String,
}

/// Host navigation subsystem.
pub trait Navigation: Send + Sync {
    /// Current location fragment, if any.
    fn fragment(&self) -> Option<String>;

    /// Subscribe to route-change notifications.
    fn subscribe(&self) -> broadcast::Receiver<RouteChanged>;
}

/// In-memory [`Navigation`] for hosts without a history subsystem, and for
/// tests.
pub struct History {
    fragment: RwLock<Option<String>>,
    sender: broadcast::Sender<RouteChanged>,
}

impl History {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self {
            fragment: RwLock::new(None),
            sender,
        }
    }

    /// History starting at `fragment`, without notifying anyone.
    pub fn starting_at(fragment: impl Into<String>) -> Self {
        let history = Self::new();
        *history
            .fragment
            .write()
            .unwrap_or_else(|e| e.into_inner()) = Some(fragment.into());
        history
    }

    /// Move to `fragment` and notify subscribers.
    pub fn navigate(&self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        *self.fragment.write().unwrap_or_else(|e| e.into_inner()) = Some(fragment.clone());
        let _ = self.sender.send(RouteChanged { fragment });
    }

    /// Re-announce the current fragment without moving.
    pub fn notify(&self) {
        if let Some(fragment) = self.fragment() {
            let _ = self.sender.send(RouteChanged { fragment });
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigation for History {
    fn fragment(&self) -> Option<String> {
        self.fragment
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<RouteChanged> {
        self.sender.subscribe()
    }
}

/// Spawn the watcher task for `service`.
///
/// The receiver is taken by the caller before spawning so no notification
/// sent after construction is missed. Each notification is judged by the
/// fragment it carries, so moving away and back before the task runs still
/// closes. The task holds only a weak reference and ends once the service
/// is gone or the channel closes.
pub(crate) fn spawn_watcher(
    service: Weak<ModalService>,
    navigation: Arc<dyn Navigation>,
    mut routes: broadcast::Receiver<RouteChanged>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match routes.recv().await {
                Ok(change) => {
                    let Some(service) = service.upgrade() else {
                        break;
                    };
                    debug!(fragment = %change.fragment, "Route changed");
                    on_route_changed(service, Some(change.fragment));
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // The skipped fragments are gone; compare the current one.
                    warn!(skipped, "Route watcher lagged behind");
                    let Some(service) = service.upgrade() else {
                        break;
                    };
                    on_route_changed(service, navigation.fragment());
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        debug!("Route watcher stopped");
    })
}

/// Close everything if the location moved away from the fingerprint.
fn on_route_changed(service: Arc<ModalService>, current: Option<String>) {
    if !service.take_stale_fingerprint(current.as_deref()) {
        return;
    }

    info!(fragment = ?current, "Location changed, closing all modals");
    tokio::spawn(async move {
        if let Err(e) = service.close(None, ModalOptions::default()).await {
            warn!(error = %e, "Failed to close modals after route change");
        }
    });
}
