//! Alert, confirm and prompt flows.
//!
//! Each flow builds a view through the host's [`DialogViews`] factory,
//! opens it, waits for the widget to report an outcome through its
//! [`OutcomeSender`], closes it and resolves with the flow's result.

use crate::bus::ModalEvent;
use crate::error::{BoxError, ModalError, ModalResult};
use crate::options::ModalOptions;
use crate::service::ModalService;
use crate::view::View;
use modalkit_util::Identifier;
use std::fmt;
use tokio::sync::mpsc;
use tracing::{debug, Instrument};

/// The three built-in flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogKind {
    Alert,
    Confirm,
    Prompt,
}

impl DialogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialogKind::Alert => "alert",
            DialogKind::Confirm => "confirm",
            DialogKind::Prompt => "prompt",
        }
    }

    fn before_event(&self, view: View, options: ModalOptions) -> ModalEvent {
        match self {
            DialogKind::Alert => ModalEvent::BeforeAlert { view, options },
            DialogKind::Confirm => ModalEvent::BeforeConfirm { view, options },
            DialogKind::Prompt => ModalEvent::BeforePrompt { view, options },
        }
    }
}

impl fmt::Display for DialogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a dialog widget reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    Confirm,
    Cancel,
    /// Prompt text.
    Submit(String),
}

/// Handle a dialog widget uses to report its outcome.
///
/// Only the first outcome the flow understands counts; the rest are
/// ignored. Sends return false once the flow has finished.
#[derive(Debug, Clone)]
pub struct OutcomeSender {
    tx: mpsc::UnboundedSender<DialogOutcome>,
}

impl OutcomeSender {
    pub fn send(&self, outcome: DialogOutcome) -> bool {
        self.tx.send(outcome).is_ok()
    }

    pub fn confirm(&self) -> bool {
        self.send(DialogOutcome::Confirm)
    }

    pub fn cancel(&self) -> bool {
        self.send(DialogOutcome::Cancel)
    }

    pub fn submit(&self, text: impl Into<String>) -> bool {
        self.send(DialogOutcome::Submit(text.into()))
    }

    /// Whether the flow stopped listening.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Host factories for the dialog widgets.
pub trait DialogViews: Send + Sync {
    fn alert_view(
        &self,
        options: &ModalOptions,
        outcome: OutcomeSender,
    ) -> Result<View, BoxError>;

    fn confirm_view(
        &self,
        options: &ModalOptions,
        outcome: OutcomeSender,
    ) -> Result<View, BoxError>;

    fn prompt_view(
        &self,
        options: &ModalOptions,
        outcome: OutcomeSender,
    ) -> Result<View, BoxError>;
}

impl ModalService {
    /// Show an alert; resolves once it is confirmed or cancelled and closed.
    pub async fn alert(&self, options: ModalOptions) -> ModalResult<()> {
        let ((), view) = self
            .run_dialog(DialogKind::Alert, &options, |outcome| match outcome {
                DialogOutcome::Confirm | DialogOutcome::Cancel => Some(()),
                DialogOutcome::Submit(_) => None,
            })
            .await?;

        self.bus.emit(ModalEvent::Alert { view, options });
        Ok(())
    }

    /// Ask a yes/no question; true on confirm, false on cancel.
    pub async fn confirm(&self, options: ModalOptions) -> ModalResult<bool> {
        let (result, view) = self
            .run_dialog(DialogKind::Confirm, &options, |outcome| match outcome {
                DialogOutcome::Confirm => Some(true),
                DialogOutcome::Cancel => Some(false),
                DialogOutcome::Submit(_) => None,
            })
            .await?;

        self.bus.emit(ModalEvent::Confirm {
            result,
            view,
            options,
        });
        Ok(result)
    }

    /// Ask for text; `None` when cancelled.
    pub async fn prompt(&self, options: ModalOptions) -> ModalResult<Option<String>> {
        let (result, view) = self
            .run_dialog(DialogKind::Prompt, &options, |outcome| match outcome {
                DialogOutcome::Submit(text) => Some(Some(text.clone())),
                DialogOutcome::Cancel => Some(None),
                DialogOutcome::Confirm => None,
            })
            .await?;

        self.bus.emit(ModalEvent::Prompt {
            result: result.clone(),
            view,
            options,
        });
        Ok(result)
    }

    /// Build, open, await an accepted outcome, close.
    ///
    /// The open runs alongside the wait for an outcome, so a widget may
    /// answer before its open has settled. An open failure still waits for
    /// the outcome before it is reported: if `render` or an animation fails,
    /// the widget may never be shown and the flow stays pending until the
    /// widget answers or drops its [`OutcomeSender`]. Hosts whose hooks can
    /// fail should drop or answer the sender when that happens.
    async fn run_dialog<T, F>(
        &self,
        kind: DialogKind,
        options: &ModalOptions,
        accept: F,
    ) -> ModalResult<(T, View)>
    where
        T: Send,
        F: Fn(&DialogOutcome) -> Option<T> + Send + Sync,
    {
        let span = tracing::debug_span!("dialog", flow = %Identifier::flow(), kind = kind.as_str());

        async {
            let dialogs = self
                .dialogs
                .as_ref()
                .ok_or(ModalError::MissingDialogViews(kind))?;

            let (tx, mut rx) = mpsc::unbounded_channel();
            let sender = OutcomeSender { tx };
            let view = match kind {
                DialogKind::Alert => dialogs.alert_view(options, sender),
                DialogKind::Confirm => dialogs.confirm_view(options, sender),
                DialogKind::Prompt => dialogs.prompt_view(options, sender),
            }
            .map_err(|source| ModalError::Factory { kind, source })?;

            let opening = self.open(view.clone(), options.clone());
            self.bus.emit(kind.before_event(view.clone(), options.clone()));

            let answer = async {
                while let Some(outcome) = rx.recv().await {
                    match accept(&outcome) {
                        Some(result) => return Some(result),
                        None => debug!(?outcome, "Ignoring outcome"),
                    }
                }
                None
            };

            let (opened, answer) = tokio::join!(opening, answer);
            opened?;
            let result = answer.ok_or(ModalError::OutcomeDropped(kind))?;
            debug!("Dialog answered");

            self.close(Some(view.clone()), options.clone()).await?;
            Ok::<_, ModalError>((result, view))
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_outcome_sender_reports_closed_receiver() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sender = OutcomeSender { tx };
        assert!(!sender.is_closed());
        assert!(sender.submit("draft"));

        drop(rx);
        assert!(sender.is_closed());
        assert!(!sender.confirm());
    }

    #[test]
    fn test_before_events() {
        let view = View::new(());
        let names: Vec<_> = [DialogKind::Alert, DialogKind::Confirm, DialogKind::Prompt]
            .iter()
            .map(|kind| kind.before_event(view.clone(), ModalOptions::default()).name())
            .collect();
        assert_eq!(names, ["before:alert", "before:confirm", "before:prompt"]);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(DialogKind::Confirm.to_string(), "confirm");
    }
}
