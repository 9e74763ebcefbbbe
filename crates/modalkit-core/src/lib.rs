//! Modal stack lifecycle orchestration.
//!
//! This crate provides the coordination layer for modal dialogs:
//! - An ordered stack of open views
//! - Open/close sequencing (render, animate, notify) through host hooks
//! - Alert, confirm and prompt flows built on that lifecycle
//! - Auto-close of every open view when the navigation location changes
//! - A typed event bus for lifecycle notifications
//! - A static request table for name-based dispatch

pub mod bus;
pub mod config;
pub mod dialog;
pub mod error;
pub mod navigation;
pub mod options;
pub mod renderer;
pub mod request;
pub mod service;
pub mod stack;
pub mod view;

pub use bus::{BusEvent, ModalBus, ModalEvent};
pub use config::ModalConfig;
pub use dialog::{DialogKind, DialogOutcome, DialogViews, OutcomeSender};
pub use error::{BoxError, ConfigError, ModalError, ModalResult};
pub use navigation::{History, Navigation, RouteChanged};
pub use options::ModalOptions;
pub use renderer::{HookKind, HookResult, ModalRenderer, NoopRenderer};
pub use request::{ModalReply, ModalRequest, RequestKind, REQUESTS};
pub use service::{ModalService, ModalServiceBuilder};
pub use stack::ViewStack;
pub use view::View;
