// Gateway application wiring.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::clients::LoggingClients;
use crate::config::{Config, StorageKind};
use crate::controller::WorkerCacheController;
use crate::http::{GatewayServer, Server};
use crate::lifecycle::Lifecycle;
use crate::network::{Network, OriginClient};
use crate::notify::LoggingNotifier;
use crate::storage::{BucketStore, DiskStore, MemoryStore};

/// Encapsulates the gateway application state.
pub struct App {
    shutdown_token: CancellationToken,
    controller: Arc<WorkerCacheController>,
    server: Arc<dyn Server>,
}

impl App {
    /// Builds the platform seams and the controller from configuration.
    pub async fn new(shutdown_token: CancellationToken, cfg: Config) -> Result<Self> {
        let store: Arc<dyn BucketStore> = match cfg.storage_kind() {
            StorageKind::Memory => Arc::new(MemoryStore::new()),
            StorageKind::Disk => Arc::new(DiskStore::new(cfg.storage_dir())),
        };
        let network: Arc<dyn Network> = Arc::new(
            OriginClient::new(cfg.origin_timeout()).context("build origin client")?,
        );
        let controller = Arc::new(WorkerCacheController::new(
            Arc::new(cfg.clone()),
            store,
            network.clone(),
            Arc::new(LoggingClients),
            Arc::new(LoggingNotifier),
            Arc::new(Lifecycle::new()),
        ));
        let server = Arc::new(GatewayServer::new(
            shutdown_token.clone(),
            cfg,
            controller.clone(),
            network,
        ));

        Ok(Self {
            shutdown_token,
            controller,
            server,
        })
    }

    /// Runs install, arms activation, and serves until shutdown.
    ///
    /// The hosting side enforces the lifecycle ordering: install completes
    /// before activation can start, and the gateway only lets the worker
    /// intercept once it is activated.
    pub async fn serve(&self, gsh: Arc<crate::shutdown::GracefulShutdown>) -> Result<()> {
        self.controller.handle_install().await.context("install phase")?;

        // Activation fires once skip-waiting is requested: automatically
        // right after install when configured, otherwise through the message
        // channel.
        let controller = self.controller.clone();
        let token = self.shutdown_token.clone();
        tokio::task::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = controller.lifecycle().wait_for_skip() => {}
            }
            if let Err(e) = controller.handle_activate().await {
                error!(
                    component = "app",
                    scope = "activate",
                    event = "failed",
                    error = %e,
                    "activation failed"
                );
            }
        });

        let server = self.server.clone();
        let app_for_close = self.clone();
        let gsh_clone = gsh.clone();
        tokio::task::spawn(async move {
            if let Err(e) = server.listen_and_serve().await {
                error!(
                    component = "app",
                    scope = "server",
                    event = "serve_failed",
                    error = %e,
                    "gateway failed to serve"
                );
            }
            if let Err(e) = app_for_close.close().await {
                error!(
                    component = "app",
                    scope = "shutdown",
                    event = "close_failed",
                    error = %e,
                    "application close failed"
                );
            }
            gsh_clone.done();
        });

        info!(component = "app", event = "started", "application lifecycle");
        Ok(())
    }

    /// Drains detached work and cancels the shutdown token.
    pub async fn close(&self) -> Result<()> {
        self.controller.tasks().drain().await;
        self.shutdown_token.cancel();
        info!(component = "app", event = "stopped", "application lifecycle");
        Ok(())
    }
}

impl Clone for App {
    fn clone(&self) -> Self {
        Self {
            shutdown_token: self.shutdown_token.clone(),
            controller: self.controller.clone(),
            server: self.server.clone(),
        }
    }
}
