// Push and notification-click cases.

use std::sync::atomic::Ordering;

use crate::support::Harness;

#[tokio::test]
async fn test_push_payload_fills_notification() {
    let harness = Harness::precached();
    harness
        .controller
        .handle_push(Some(br#"{"title":"Streak","body":"Day 12"}"#))
        .await;

    let shown = harness.notifier.shown.lock().unwrap();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].title, "Streak");
    assert_eq!(shown[0].body, "Day 12");
    assert!(shown[0].icon.is_some());
    assert!(shown[0].badge.is_some());
    assert_eq!(shown[0].vibrate, vec![200, 100, 200]);
}

#[tokio::test]
async fn test_push_without_payload_uses_defaults() {
    let harness = Harness::precached();
    harness.controller.handle_push(None).await;

    let shown = harness.notifier.shown.lock().unwrap();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].title, harness.cfg.push_title());
    assert_eq!(shown[0].body, harness.cfg.push_body());
}

/// Test that a malformed payload degrades to defaults instead of failing.
#[tokio::test]
async fn test_malformed_push_payload_uses_defaults() {
    let harness = Harness::precached();
    harness.controller.handle_push(Some(b"{not json")).await;

    let shown = harness.notifier.shown.lock().unwrap();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].title, harness.cfg.push_title());
}

#[tokio::test]
async fn test_partial_payload_fills_missing_fields_from_defaults() {
    let harness = Harness::precached();
    harness
        .controller
        .handle_push(Some(br#"{"title":"Only title"}"#))
        .await;

    let shown = harness.notifier.shown.lock().unwrap();
    assert_eq!(shown[0].title, "Only title");
    assert_eq!(shown[0].body, harness.cfg.push_body());
}

#[tokio::test]
async fn test_notification_click_opens_app_root() {
    let harness = Harness::precached();
    harness.controller.handle_notification_click().await;

    assert_eq!(harness.notifier.closed.load(Ordering::SeqCst), 1);
    let opened = harness.clients.opened.lock().unwrap();
    assert_eq!(opened.len(), 1);
    assert_eq!(opened[0].as_str(), "https://apps.example.com/mastery/");
}
