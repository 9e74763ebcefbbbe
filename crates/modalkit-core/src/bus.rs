//! Event bus for modal lifecycle notifications.
//!
//! Every phase boundary of an open/close and every dialog flow emits a
//! [`ModalEvent`]. Events are delivered in emission order to every
//! subscriber through a broadcast channel.
//!
//! # Example
//!
//! ```ignore
//! let mut rx = service.subscribe();
//! tokio::spawn(async move {
//!     while let Ok(event) = rx.recv().await {
//!         println!("{} {}", event.name(), event.view());
//!     }
//! });
//! ```

use crate::options::ModalOptions;
use crate::view::View;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

/// Default channel capacity.
pub const DEFAULT_CAPACITY: usize = 256;

/// A lifecycle notification.
#[derive(Debug, Clone)]
pub enum ModalEvent {
    BeforeOpen { view: View, options: ModalOptions },
    Open { view: View, options: ModalOptions },
    BeforeClose { view: View, options: ModalOptions },
    Close { view: View, options: ModalOptions },
    BeforeAlert { view: View, options: ModalOptions },
    /// Alert finished; alerts carry no result.
    Alert { view: View, options: ModalOptions },
    BeforeConfirm { view: View, options: ModalOptions },
    Confirm {
        result: bool,
        view: View,
        options: ModalOptions,
    },
    BeforePrompt { view: View, options: ModalOptions },
    /// Prompt finished; `None` when cancelled.
    Prompt {
        result: Option<String>,
        view: View,
        options: ModalOptions,
    },
}

impl ModalEvent {
    /// Event name, e.g. `before:open`.
    pub fn name(&self) -> &'static str {
        match self {
            ModalEvent::BeforeOpen { .. } => "before:open",
            ModalEvent::Open { .. } => "open",
            ModalEvent::BeforeClose { .. } => "before:close",
            ModalEvent::Close { .. } => "close",
            ModalEvent::BeforeAlert { .. } => "before:alert",
            ModalEvent::Alert { .. } => "alert",
            ModalEvent::BeforeConfirm { .. } => "before:confirm",
            ModalEvent::Confirm { .. } => "confirm",
            ModalEvent::BeforePrompt { .. } => "before:prompt",
            ModalEvent::Prompt { .. } => "prompt",
        }
    }

    /// The view the event is about.
    pub fn view(&self) -> &View {
        match self {
            ModalEvent::BeforeOpen { view, .. }
            | ModalEvent::Open { view, .. }
            | ModalEvent::BeforeClose { view, .. }
            | ModalEvent::Close { view, .. }
            | ModalEvent::BeforeAlert { view, .. }
            | ModalEvent::Alert { view, .. }
            | ModalEvent::BeforeConfirm { view, .. }
            | ModalEvent::Confirm { view, .. }
            | ModalEvent::BeforePrompt { view, .. }
            | ModalEvent::Prompt { view, .. } => view,
        }
    }

    /// The options of the triggering call.
    pub fn options(&self) -> &ModalOptions {
        match self {
            ModalEvent::BeforeOpen { options, .. }
            | ModalEvent::Open { options, .. }
            | ModalEvent::BeforeClose { options, .. }
            | ModalEvent::Close { options, .. }
            | ModalEvent::BeforeAlert { options, .. }
            | ModalEvent::Alert { options, .. }
            | ModalEvent::BeforeConfirm { options, .. }
            | ModalEvent::Confirm { options, .. }
            | ModalEvent::BeforePrompt { options, .. }
            | ModalEvent::Prompt { options, .. } => options,
        }
    }

    /// Serializable summary, views reduced to their ids.
    pub fn summary(&self) -> BusEvent {
        let result = match self {
            ModalEvent::Confirm { result, .. } => serde_json::Value::Bool(*result),
            ModalEvent::Prompt { result, .. } => result
                .clone()
                .map_or(serde_json::Value::Null, serde_json::Value::String),
            _ => serde_json::Value::Null,
        };
        BusEvent {
            event_type: self.name().to_string(),
            view: self.view().id().to_string(),
            options: self.options().clone(),
            result,
        }
    }
}

/// A serialized event for logging or forwarding across process boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusEvent {
    /// Event name.
    #[serde(rename = "type")]
    pub event_type: String,
    /// View id.
    pub view: String,
    pub options: ModalOptions,
    /// Flow result (`null` for lifecycle events and alerts).
    #[serde(default)]
    pub result: serde_json::Value,
}

/// Broadcast bus carrying [`ModalEvent`]s.
#[derive(Clone)]
pub struct ModalBus {
    sender: broadcast::Sender<ModalEvent>,
}

impl ModalBus {
    /// Create a bus whose subscribers may lag by at most `capacity` events.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Emit an event to all current subscribers.
    pub fn emit(&self, event: ModalEvent) {
        trace!(event = event.name(), view = %event.view(), "modal event");
        // Ignore send errors (no receivers)
        let _ = self.sender.send(event);
    }

    /// Subscribe to events emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ModalEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ModalBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
