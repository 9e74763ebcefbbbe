//! Testing utilities and mocks for modalkit.
//!
//! - **Mocks**: a renderer that journals hook calls alongside bus events,
//!   and a dialog factory whose widgets the test answers
//! - **Assertions**: helpers over drained event streams
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use modalkit_test_utils::{RecordingRenderer, ScriptedDialogs};
//!
//! #[tokio::test]
//! async fn test_confirm() {
//!     let renderer = RecordingRenderer::new();
//!     let dialogs = ScriptedDialogs::new();
//!     let service = ModalService::builder(Arc::new(renderer.clone()))
//!         .dialogs(Arc::new(dialogs.clone()))
//!         .build();
//!     renderer.observe(service.bus());
//!
//!     dialogs.respond_on_open(service.bus(), DialogOutcome::Confirm);
//!     assert!(service.confirm(ModalOptions::default()).await.unwrap());
//! }
//! ```

pub mod assertions;
pub mod mocks;

// Re-export commonly used items
pub use assertions::{assert_events, drain_events, event_names};
pub use mocks::{
    BuiltDialog, DialogWidget, HookCall, JournalEntry, RecordingRenderer, ScriptedDialogs,
};
