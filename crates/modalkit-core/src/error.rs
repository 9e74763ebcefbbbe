//! Error types for the core crate.

use crate::dialog::DialogKind;
use crate::renderer::HookKind;
use crate::request::RequestKind;
use thiserror::Error;

/// Boxed error returned by host collaborators (hooks, factories).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Core error types.
#[derive(Debug, Error)]
pub enum ModalError {
    /// A renderer hook failed.
    #[error("{hook} hook failed: {source}")]
    Hook {
        hook: HookKind,
        #[source]
        source: BoxError,
    },

    /// A dialog factory could not build its view.
    #[error("failed to build {kind} view: {source}")]
    Factory {
        kind: DialogKind,
        #[source]
        source: BoxError,
    },

    /// A dialog flow ran on a service without dialog factories.
    #[error("no dialog views configured for {0}")]
    MissingDialogViews(DialogKind),

    /// The widget dropped its outcome sender without answering.
    #[error("{0} view dropped its outcome sender before answering")]
    OutcomeDropped(DialogKind),

    /// Request name not present in the request table.
    #[error("unknown request: {0}")]
    UnknownRequest(String),

    /// Request needs a view but none was supplied.
    #[error("request '{0}' requires a view")]
    MissingView(RequestKind),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid JSON/JSONC syntax.
    #[error("invalid config at {path}: {message}")]
    InvalidJson { path: String, message: String },

    /// Config validation failed.
    #[error("config validation failed: {message}")]
    Validation { message: String },
}

/// Result type for modal operations.
pub type ModalResult<T> = Result<T, ModalError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_hook_error_display_and_source() {
        let err = ModalError::Hook {
            hook: HookKind::AnimateSwap,
            source: "transition aborted".into(),
        };
        assert_eq!(
            err.to_string(),
            "animate_swap hook failed: transition aborted"
        );
        assert!(StdError::source(&err).is_some());
    }

    #[test]
    fn test_config_error_converts() {
        let err: ModalError = ConfigError::Validation {
            message: "event_capacity must be greater than zero".to_string(),
        }
        .into();
        assert!(matches!(err, ModalError::Config(_)));
        assert!(err.to_string().contains("event_capacity"));
    }

    #[test]
    fn test_dialog_errors_name_the_flow() {
        assert_eq!(
            ModalError::OutcomeDropped(DialogKind::Prompt).to_string(),
            "prompt view dropped its outcome sender before answering"
        );
        assert_eq!(
            ModalError::MissingView(RequestKind::Open).to_string(),
            "request 'open' requires a view"
        );
    }
}
