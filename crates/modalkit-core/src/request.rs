//! Named requests.
//!
//! Hosts that route commands by name (a command palette, a message channel)
//! resolve them through the static [`REQUESTS`] table and hand the result to
//! [`ModalService::request`].

use crate::error::{ModalError, ModalResult};
use crate::options::ModalOptions;
use crate::service::ModalService;
use crate::view::View;
use std::fmt;
use tracing::debug;

/// Request names understood by the service.
pub const REQUESTS: [(&str, RequestKind); 6] = [
    ("open", RequestKind::Open),
    ("close", RequestKind::Close),
    ("alert", RequestKind::Alert),
    ("confirm", RequestKind::Confirm),
    ("prompt", RequestKind::Prompt),
    ("isOpen", RequestKind::IsOpen),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Open,
    Close,
    Alert,
    Confirm,
    Prompt,
    IsOpen,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Open => "open",
            RequestKind::Close => "close",
            RequestKind::Alert => "alert",
            RequestKind::Confirm => "confirm",
            RequestKind::Prompt => "prompt",
            RequestKind::IsOpen => "isOpen",
        }
    }

    /// Look a request up by name.
    pub fn parse(name: &str) -> Option<Self> {
        REQUESTS
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, kind)| *kind)
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request with its arguments.
#[derive(Debug, Clone)]
pub enum ModalRequest {
    Open { view: View, options: ModalOptions },
    Close {
        view: Option<View>,
        options: ModalOptions,
    },
    Alert { options: ModalOptions },
    Confirm { options: ModalOptions },
    Prompt { options: ModalOptions },
    IsOpen,
}

impl ModalRequest {
    /// Assemble a request from loose parts. Only `open` requires a view;
    /// requests that take none ignore it.
    pub fn from_parts(
        kind: RequestKind,
        view: Option<View>,
        options: ModalOptions,
    ) -> ModalResult<Self> {
        Ok(match kind {
            RequestKind::Open => ModalRequest::Open {
                view: view.ok_or(ModalError::MissingView(kind))?,
                options,
            },
            RequestKind::Close => ModalRequest::Close { view, options },
            RequestKind::Alert => ModalRequest::Alert { options },
            RequestKind::Confirm => ModalRequest::Confirm { options },
            RequestKind::Prompt => ModalRequest::Prompt { options },
            RequestKind::IsOpen => ModalRequest::IsOpen,
        })
    }

    pub fn kind(&self) -> RequestKind {
        match self {
            ModalRequest::Open { .. } => RequestKind::Open,
            ModalRequest::Close { .. } => RequestKind::Close,
            ModalRequest::Alert { .. } => RequestKind::Alert,
            ModalRequest::Confirm { .. } => RequestKind::Confirm,
            ModalRequest::Prompt { .. } => RequestKind::Prompt,
            ModalRequest::IsOpen => RequestKind::IsOpen,
        }
    }
}

/// Result of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalReply {
    /// `open`, `close` and `alert` finished.
    Done,
    Confirmed(bool),
    Prompted(Option<String>),
    IsOpen(bool),
}

impl ModalService {
    /// Execute a request.
    pub async fn request(&self, request: ModalRequest) -> ModalResult<ModalReply> {
        debug!(request = request.kind().as_str(), "Handling modal request");
        match request {
            ModalRequest::Open { view, options } => {
                self.open(view, options).await.map(|()| ModalReply::Done)
            }
            ModalRequest::Close { view, options } => {
                self.close(view, options).await.map(|()| ModalReply::Done)
            }
            ModalRequest::Alert { options } => self.alert(options).await.map(|()| ModalReply::Done),
            ModalRequest::Confirm { options } => {
                self.confirm(options).await.map(ModalReply::Confirmed)
            }
            ModalRequest::Prompt { options } => {
                self.prompt(options).await.map(ModalReply::Prompted)
            }
            ModalRequest::IsOpen => Ok(ModalReply::IsOpen(self.is_open())),
        }
    }

    /// Execute a request looked up by name.
    pub async fn request_named(
        &self,
        name: &str,
        view: Option<View>,
        options: ModalOptions,
    ) -> ModalResult<ModalReply> {
        let kind =
            RequestKind::parse(name).ok_or_else(|| ModalError::UnknownRequest(name.to_string()))?;
        self.request(ModalRequest::from_parts(kind, view, options)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_names() {
        for (name, kind) in REQUESTS {
            assert_eq!(kind.as_str(), name);
            assert_eq!(RequestKind::parse(name), Some(kind));
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(RequestKind::parse("dismiss"), None);
        assert_eq!(RequestKind::parse("is_open"), None);
    }

    #[test]
    fn test_open_requires_view() {
        let err = ModalRequest::from_parts(RequestKind::Open, None, ModalOptions::default())
            .unwrap_err();
        assert!(matches!(err, ModalError::MissingView(RequestKind::Open)));
    }

    #[test]
    fn test_from_parts_kinds() {
        let view = View::new(());
        for (_, kind) in REQUESTS {
            let request =
                ModalRequest::from_parts(kind, Some(view.clone()), ModalOptions::default())
                    .unwrap();
            assert_eq!(request.kind(), kind);
        }
    }
}
