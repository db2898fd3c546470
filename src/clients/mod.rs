//! Controlled-page access.

use async_trait::async_trait;
use tracing::info;
use url::Url;

/// Pages under the worker's control.
#[async_trait]
pub trait ClientRegistry: Send + Sync {
    /// Takes control of every open page without waiting for a reload.
    async fn claim(&self) -> anyhow::Result<()>;

    /// Opens (or focuses) a window at the given URL.
    async fn open_window(&self, url: &Url) -> anyhow::Result<()>;
}

/// Gateway-side registry. The gateway fronts plain HTTP clients rather than
/// browser windows, so control transfers only surface in the log.
pub struct LoggingClients;

#[async_trait]
impl ClientRegistry for LoggingClients {
    async fn claim(&self) -> anyhow::Result<()> {
        info!(
            component = "clients",
            event = "claim",
            "took control of open clients"
        );
        Ok(())
    }

    async fn open_window(&self, url: &Url) -> anyhow::Result<()> {
        info!(
            component = "clients",
            event = "open_window",
            url = %url,
            "window open requested"
        );
        Ok(())
    }
}
