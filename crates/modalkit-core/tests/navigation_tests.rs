//! Auto-close on navigation.

use modalkit_core::{
    History, HookKind, ModalConfig, ModalEvent, ModalOptions, ModalService, View,
};
use modalkit_test_utils::{drain_events, RecordingRenderer};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::timeout;

fn setup(history: &Arc<History>, config: ModalConfig) -> (Arc<ModalService>, RecordingRenderer) {
    let renderer = RecordingRenderer::new();
    let service = ModalService::builder(Arc::new(renderer.clone()))
        .config(config)
        .navigation(history.clone())
        .build();
    (service, renderer)
}

/// Wait until `count` close events have arrived.
async fn wait_for_closes(rx: &mut broadcast::Receiver<ModalEvent>, count: usize) -> Vec<View> {
    let mut closed = Vec::new();
    while closed.len() < count {
        let event = timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("timed out waiting for close")
            .unwrap();
        if let ModalEvent::Close { view, .. } = event {
            closed.push(view);
        }
    }
    closed
}

/// Let the watcher task see pending notifications.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}

#[tokio::test]
async fn test_open_records_fingerprint() {
    let history = Arc::new(History::starting_at("inbox"));
    let (service, _renderer) = setup(&history, ModalConfig::default());
    assert_eq!(service.location_fingerprint(), None);

    service.open(View::new("a"), ModalOptions::default()).await.unwrap();

    assert_eq!(service.location_fingerprint().as_deref(), Some("inbox"));
}

#[tokio::test]
async fn test_route_change_closes_everything() {
    let history = Arc::new(History::starting_at("inbox"));
    let (service, renderer) = setup(&history, ModalConfig::default());
    let a = View::new("a");
    let b = View::new("b");
    service.open(a.clone(), ModalOptions::default()).await.unwrap();
    service.open(b.clone(), ModalOptions::default()).await.unwrap();
    let mut rx = service.subscribe();

    history.navigate("settings");
    let closed = wait_for_closes(&mut rx, 2).await;

    assert_eq!(closed, vec![a.clone(), b.clone()]);
    assert!(renderer.was_called_with(HookKind::AnimateOut, &[&b]));
    assert!(service.views().is_empty());
    assert!(!service.is_open());
    assert_eq!(service.location_fingerprint(), None);
}

#[tokio::test]
async fn test_away_and_back_still_closes() {
    let history = Arc::new(History::starting_at("inbox"));
    let (service, _renderer) = setup(&history, ModalConfig::default());
    let view = View::new("a");
    service.open(view.clone(), ModalOptions::default()).await.unwrap();
    let mut rx = service.subscribe();

    // Both moves land before the watcher gets to run.
    history.navigate("settings");
    history.navigate("inbox");
    let closed = wait_for_closes(&mut rx, 1).await;

    assert_eq!(closed, vec![view]);
    assert!(service.views().is_empty());
}

#[tokio::test]
async fn test_same_fragment_keeps_views() {
    let history = Arc::new(History::starting_at("inbox"));
    let (service, _renderer) = setup(&history, ModalConfig::default());
    let view = View::new("a");
    service.open(view.clone(), ModalOptions::default()).await.unwrap();
    let mut rx = service.subscribe();

    history.notify();
    settle().await;

    assert!(drain_events(&mut rx).is_empty());
    assert_eq!(service.views(), vec![view]);
    assert!(service.is_open());
}

#[tokio::test]
async fn test_reopen_after_route_change_uses_new_fragment() {
    let history = Arc::new(History::starting_at("inbox"));
    let (service, _renderer) = setup(&history, ModalConfig::default());
    service.open(View::new("a"), ModalOptions::default()).await.unwrap();
    let mut rx = service.subscribe();

    history.navigate("settings");
    wait_for_closes(&mut rx, 1).await;
    let view = View::new("b");
    service.open(view.clone(), ModalOptions::default()).await.unwrap();

    assert_eq!(service.location_fingerprint().as_deref(), Some("settings"));

    // A notification for the current fragment leaves the new view alone.
    history.notify();
    settle().await;
    assert_eq!(service.views(), vec![view]);
}

#[tokio::test]
async fn test_route_change_with_nothing_open() {
    let history = Arc::new(History::starting_at("inbox"));
    let (service, renderer) = setup(&history, ModalConfig::default());
    let mut rx = service.subscribe();

    history.navigate("settings");
    settle().await;

    assert!(drain_events(&mut rx).is_empty());
    assert!(renderer.calls().is_empty());
}

#[tokio::test]
async fn test_close_on_navigate_disabled() {
    let history = Arc::new(History::starting_at("inbox"));
    let config = ModalConfig {
        close_on_navigate: false,
        ..Default::default()
    };
    let (service, _renderer) = setup(&history, config);
    let view = View::new("a");
    service.open(view.clone(), ModalOptions::default()).await.unwrap();

    history.navigate("settings");
    settle().await;

    assert_eq!(service.views(), vec![view]);
    // The fingerprint is still recorded for hosts that query it.
    assert_eq!(service.location_fingerprint().as_deref(), Some("inbox"));
}

#[tokio::test]
async fn test_dropped_service_stops_watching() {
    let history = Arc::new(History::starting_at("inbox"));
    let (service, renderer) = setup(&history, ModalConfig::default());
    service.open(View::new("a"), ModalOptions::default()).await.unwrap();
    renderer.clear();
    drop(service);

    history.navigate("settings");
    settle().await;

    assert!(renderer.calls().is_empty());
}
