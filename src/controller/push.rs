//! Push and notification-click handling.
//!
//! Display-only; no caching interaction.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::clients::ClientRegistry;
use crate::notify::{Notification, Notifier};

use super::WorkerCacheController;

/// Short-long-short vibration cadence used for every notification.
const VIBRATE_PATTERN: [u32; 3] = [200, 100, 200];

#[derive(Debug, Default, Deserialize)]
struct PushPayload {
    title: Option<String>,
    body: Option<String>,
}

impl WorkerCacheController {
    /// Shows a notification for an incoming push. Absent or malformed
    /// payloads fall back to the configured default text, field by field.
    pub async fn handle_push(&self, payload: Option<&[u8]>) {
        let parsed = payload
            .and_then(|raw| serde_json::from_slice::<PushPayload>(raw).ok())
            .unwrap_or_default();

        let notification = Notification {
            title: parsed
                .title
                .unwrap_or_else(|| self.cfg.push_title().to_string()),
            body: parsed
                .body
                .unwrap_or_else(|| self.cfg.push_body().to_string()),
            icon: self
                .cfg
                .push_icon()
                .and_then(|path| self.base.resolve(path).ok()),
            badge: self
                .cfg
                .push_badge()
                .and_then(|path| self.base.resolve(path).ok()),
            vibrate: VIBRATE_PATTERN.to_vec(),
        };

        if let Err(e) = self.notifier.show(&notification).await {
            warn!(
                component = "push",
                event = "show_failed",
                error = %e,
                "notification not shown"
            );
        }
    }

    /// Closes the notification and routes the click back to the app root.
    pub async fn handle_notification_click(&self) {
        if let Err(e) = self.notifier.close().await {
            debug!(
                component = "push",
                event = "close_failed",
                error = %e,
                "notification close failed"
            );
        }

        let Some(root) = self.base.root_url() else {
            debug!(
                component = "push",
                event = "no_scope_root",
                "no parseable scope to open"
            );
            return;
        };
        if let Err(e) = self.clients.open_window(root).await {
            warn!(
                component = "push",
                event = "open_failed",
                error = %e,
                "window open failed"
            );
        }
    }
}
