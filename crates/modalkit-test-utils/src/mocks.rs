//! Mock implementations for testing.
//!
//! Provides test doubles for the host collaborators so the service can be
//! exercised without a real display.

use async_trait::async_trait;
use modalkit_core::{
    BoxError, DialogKind, DialogOutcome, DialogViews, HookKind, HookResult, ModalBus, ModalEvent,
    ModalOptions, ModalRenderer, OutcomeSender, View,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// A recorded hook call.
#[derive(Debug, Clone, PartialEq)]
pub struct HookCall {
    pub hook: HookKind,
    /// Views passed to the hook, in argument order.
    pub views: Vec<View>,
    pub options: ModalOptions,
}

/// One line of the renderer's journal.
#[derive(Debug, Clone)]
pub enum JournalEntry {
    Event { name: &'static str, view: View },
    Hook(HookCall),
}

impl JournalEntry {
    /// Event name or hook name.
    pub fn name(&self) -> &'static str {
        match self {
            JournalEntry::Event { name, .. } => *name,
            JournalEntry::Hook(call) => call.hook.as_str(),
        }
    }
}

/// Renderer that records every hook call.
///
/// Once [`observe`](Self::observe) is given the service bus, events emitted
/// before each hook call are journaled ahead of it, so the journal shows the
/// exact interleaving of notifications and hooks.
///
/// # Example
///
/// ```rust,ignore
/// let renderer = RecordingRenderer::new().fail_on(HookKind::AnimateIn, "no screen");
/// ```
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    inner: Arc<RecorderInner>,
}

#[derive(Default)]
struct RecorderInner {
    journal: Mutex<Vec<JournalEntry>>,
    events: Mutex<Option<broadcast::Receiver<ModalEvent>>>,
    failures: Mutex<HashMap<HookKind, String>>,
    delay: Mutex<Option<Duration>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `hook` fail with `message`.
    pub fn fail_on(self, hook: HookKind, message: &str) -> Self {
        self.inner
            .failures
            .lock()
            .unwrap()
            .insert(hook, message.to_string());
        self
    }

    /// Sleep this long inside every hook.
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.inner.delay.lock().unwrap() = Some(delay);
        self
    }

    /// Journal events from `bus` alongside hook calls.
    pub fn observe(&self, bus: &ModalBus) {
        *self.inner.events.lock().unwrap() = Some(bus.subscribe());
    }

    /// Everything journaled so far.
    pub fn journal(&self) -> Vec<JournalEntry> {
        self.drain_events();
        self.inner.journal.lock().unwrap().clone()
    }

    /// Names of journal entries, e.g. `["before:open", "render", ...]`.
    pub fn timeline(&self) -> Vec<&'static str> {
        self.journal().iter().map(JournalEntry::name).collect()
    }

    /// Hook calls only.
    pub fn calls(&self) -> Vec<HookCall> {
        self.journal()
            .into_iter()
            .filter_map(|entry| match entry {
                JournalEntry::Hook(call) => Some(call),
                JournalEntry::Event { .. } => None,
            })
            .collect()
    }

    /// Calls to one hook.
    pub fn calls_for(&self, hook: HookKind) -> Vec<HookCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.hook == hook)
            .collect()
    }

    /// Whether `hook` was called with exactly `views`.
    pub fn was_called_with(&self, hook: HookKind, views: &[&View]) -> bool {
        self.calls_for(hook).iter().any(|call| {
            call.views.len() == views.len()
                && call.views.iter().zip(views).all(|(a, b)| a.same(b))
        })
    }

    /// Forget everything journaled so far.
    pub fn clear(&self) {
        self.drain_events();
        self.inner.journal.lock().unwrap().clear();
    }

    fn drain_events(&self) {
        let mut events = self.inner.events.lock().unwrap();
        let Some(rx) = events.as_mut() else {
            return;
        };
        let mut journal = self.inner.journal.lock().unwrap();
        while let Ok(event) = rx.try_recv() {
            journal.push(JournalEntry::Event {
                name: event.name(),
                view: event.view().clone(),
            });
        }
    }

    async fn record(&self, hook: HookKind, views: Vec<View>, options: &ModalOptions) -> HookResult {
        self.drain_events();
        self.inner
            .journal
            .lock()
            .unwrap()
            .push(JournalEntry::Hook(HookCall {
                hook,
                views,
                options: options.clone(),
            }));

        let delay = *self.inner.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.inner.failures.lock().unwrap().get(&hook).cloned();
        match failure {
            Some(message) => Err(message.into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ModalRenderer for RecordingRenderer {
    async fn render(&self, view: &View, options: &ModalOptions) -> HookResult {
        self.record(HookKind::Render, vec![view.clone()], options)
            .await
    }

    async fn remove(&self, view: &View, options: &ModalOptions) -> HookResult {
        self.record(HookKind::Remove, vec![view.clone()], options)
            .await
    }

    async fn animate_in(&self, view: &View, options: &ModalOptions) -> HookResult {
        self.record(HookKind::AnimateIn, vec![view.clone()], options)
            .await
    }

    async fn animate_swap(
        &self,
        outgoing: &View,
        incoming: &View,
        options: &ModalOptions,
    ) -> HookResult {
        self.record(
            HookKind::AnimateSwap,
            vec![outgoing.clone(), incoming.clone()],
            options,
        )
        .await
    }

    async fn animate_out(&self, view: &View, options: &ModalOptions) -> HookResult {
        self.record(HookKind::AnimateOut, vec![view.clone()], options)
            .await
    }
}

/// Widget wrapped in the views built by [`ScriptedDialogs`].
#[derive(Debug, Clone, PartialEq)]
pub struct DialogWidget {
    pub kind: DialogKind,
    pub options: ModalOptions,
}

/// A dialog built by [`ScriptedDialogs`].
#[derive(Debug, Clone)]
pub struct BuiltDialog {
    pub kind: DialogKind,
    pub view: View,
    pub outcome: OutcomeSender,
}

/// Dialog factory whose widgets are answered by the test.
#[derive(Clone, Default)]
pub struct ScriptedDialogs {
    inner: Arc<Mutex<ScriptState>>,
}

#[derive(Default)]
struct ScriptState {
    built: Vec<BuiltDialog>,
    failing: HashSet<DialogKind>,
    answers: HashMap<DialogKind, DialogOutcome>,
}

impl ScriptedDialogs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the factory for `kind` fail.
    pub fn failing(self, kind: DialogKind) -> Self {
        self.inner.lock().unwrap().failing.insert(kind);
        self
    }

    /// Answer every `kind` dialog with `outcome` as soon as it is built.
    pub fn answering(self, kind: DialogKind, outcome: DialogOutcome) -> Self {
        self.inner.lock().unwrap().answers.insert(kind, outcome);
        self
    }

    /// Every dialog built so far.
    pub fn built(&self) -> Vec<BuiltDialog> {
        self.inner.lock().unwrap().built.clone()
    }

    /// The most recent dialog of `kind`.
    pub fn last(&self, kind: DialogKind) -> Option<BuiltDialog> {
        self.inner
            .lock()
            .unwrap()
            .built
            .iter()
            .rev()
            .find(|dialog| dialog.kind == kind)
            .cloned()
    }

    /// Outcome sender of the widget behind `view`.
    pub fn sender_for(&self, view: &View) -> Option<OutcomeSender> {
        self.inner
            .lock()
            .unwrap()
            .built
            .iter()
            .find(|dialog| dialog.view.same(view))
            .map(|dialog| dialog.outcome.clone())
    }

    /// Send `outcome` to the first dialog view that finishes opening.
    ///
    /// Subscribes before returning, so the call can be made right before
    /// starting the flow.
    pub fn respond_on_open(&self, bus: &ModalBus, outcome: DialogOutcome) -> JoinHandle<()> {
        let mut rx = bus.subscribe();
        let dialogs = self.clone();
        tokio::spawn(async move {
            while let Ok(event) = rx.recv().await {
                if let ModalEvent::Open { view, .. } = event {
                    if let Some(sender) = dialogs.sender_for(&view) {
                        sender.send(outcome);
                        break;
                    }
                }
            }
        })
    }

    fn build(
        &self,
        kind: DialogKind,
        options: &ModalOptions,
        outcome: OutcomeSender,
    ) -> Result<View, BoxError> {
        let mut state = self.inner.lock().unwrap();
        if state.failing.contains(&kind) {
            return Err(format!("{kind} widget unavailable").into());
        }

        let view = View::new(DialogWidget {
            kind,
            options: options.clone(),
        });
        if let Some(answer) = state.answers.get(&kind) {
            outcome.send(answer.clone());
        }
        state.built.push(BuiltDialog {
            kind,
            view: view.clone(),
            outcome,
        });
        Ok(view)
    }
}

impl DialogViews for ScriptedDialogs {
    fn alert_view(
        &self,
        options: &ModalOptions,
        outcome: OutcomeSender,
    ) -> Result<View, BoxError> {
        self.build(DialogKind::Alert, options, outcome)
    }

    fn confirm_view(
        &self,
        options: &ModalOptions,
        outcome: OutcomeSender,
    ) -> Result<View, BoxError> {
        self.build(DialogKind::Confirm, options, outcome)
    }

    fn prompt_view(
        &self,
        options: &ModalOptions,
        outcome: OutcomeSender,
    ) -> Result<View, BoxError> {
        self.build(DialogKind::Prompt, options, outcome)
    }
}
