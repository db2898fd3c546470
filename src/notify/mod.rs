//! Notification display seam.

use async_trait::async_trait;
use tracing::info;
use url::Url;

/// A notification ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: Option<Url>,
    pub badge: Option<Url>,
    pub vibrate: Vec<u32>,
}

/// Display surface for notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn show(&self, notification: &Notification) -> anyhow::Result<()>;

    /// Dismisses the currently shown notification, if any.
    async fn close(&self) -> anyhow::Result<()>;
}

/// Log-only notifier for the gateway.
pub struct LoggingNotifier;

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn show(&self, notification: &Notification) -> anyhow::Result<()> {
        info!(
            component = "notify",
            event = "show",
            title = %notification.title,
            body = %notification.body,
            "notification"
        );
        Ok(())
    }

    async fn close(&self) -> anyhow::Result<()> {
        info!(component = "notify", event = "close", "notification dismissed");
        Ok(())
    }
}
