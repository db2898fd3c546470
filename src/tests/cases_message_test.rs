// Message-channel cases: skip-waiting control and forward compatibility.

use std::time::Duration;

use serde_json::json;

use crate::support::Harness;

#[tokio::test]
async fn test_skip_waiting_message_requests_activation() {
    let harness = Harness::precached();
    harness
        .controller
        .handle_message(&json!({ "type": "SKIP_WAITING" }));
    assert!(harness.controller.lifecycle().skip_requested());
}

/// Test that every other message shape is a silent no-op.
#[tokio::test]
async fn test_unknown_message_is_ignored() {
    let harness = Harness::precached();

    harness.controller.handle_message(&json!({ "type": "OTHER" }));
    harness
        .controller
        .handle_message(&json!({ "kind": "SKIP_WAITING" }));
    harness.controller.handle_message(&json!("SKIP_WAITING"));
    harness.controller.handle_message(&json!(null));
    harness.controller.handle_message(&json!(42));

    assert!(!harness.controller.lifecycle().skip_requested());
}

/// Test that a waiting activation driver is released by the message.
#[tokio::test]
async fn test_skip_waiting_unblocks_waiter() {
    let harness = Harness::precached();
    let lifecycle = harness.controller.lifecycle().clone();
    let waiter = tokio::spawn(async move { lifecycle.wait_for_skip().await });

    harness
        .controller
        .handle_message(&json!({ "type": "SKIP_WAITING" }));

    tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .expect("waiter must resolve after the message")
        .unwrap();
}

/// Test that the request also resolves waiters that arrive late.
#[tokio::test]
async fn test_skip_waiting_is_sticky() {
    let harness = Harness::precached();
    harness
        .controller
        .handle_message(&json!({ "type": "SKIP_WAITING" }));

    tokio::time::timeout(
        Duration::from_secs(1),
        harness.controller.lifecycle().wait_for_skip(),
    )
    .await
    .expect("late waiter must resolve immediately");
}
