//! Assertion helpers for event streams.

use modalkit_core::{ModalEvent, View};
use tokio::sync::broadcast;

/// Take every event already waiting on `rx`.
pub fn drain_events(rx: &mut broadcast::Receiver<ModalEvent>) -> Vec<ModalEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Names of `events`, in order.
pub fn event_names(events: &[ModalEvent]) -> Vec<&'static str> {
    events.iter().map(ModalEvent::name).collect()
}

/// Assert that `events` are exactly `expected` (name and view), in order.
pub fn assert_events(events: &[ModalEvent], expected: &[(&str, &View)]) {
    let actual: Vec<(&str, &str)> = events
        .iter()
        .map(|event| (event.name(), event.view().id()))
        .collect();
    let wanted: Vec<(&str, &str)> = expected
        .iter()
        .map(|(name, view)| (*name, view.id()))
        .collect();

    assert_eq!(
        actual, wanted,
        "Event sequence mismatch.\nExpected: {:?}\nActual: {:?}",
        wanted, actual
    );
}
