// Package shutdown provides graceful shutdown for the gateway.

use anyhow::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::signal;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, Error)]
#[error("graceful shutdown timeout exceeded")]
pub struct TimeoutError;

/// Waits for an OS signal or token cancellation, then for every registered
/// task to report done, bounded by a timeout.
#[derive(Clone)]
pub struct GracefulShutdown {
    shutdown_token: CancellationToken,
    timeout: Duration,
    registered: Arc<AtomicUsize>,
    done: Arc<Semaphore>,
}

impl GracefulShutdown {
    pub fn new(shutdown_token: CancellationToken, timeout: Duration) -> Self {
        Self {
            shutdown_token,
            timeout,
            registered: Arc::new(AtomicUsize::new(0)),
            done: Arc::new(Semaphore::new(0)),
        }
    }

    /// Registers n tasks that must report done before shutdown completes.
    pub fn add(&self, n: usize) {
        self.registered.fetch_add(n, Ordering::SeqCst);
    }

    /// Marks one registered task as done.
    pub fn done(&self) {
        self.done.add_permits(1);
    }

    /// Blocks until shutdown is requested and every registered task reports
    /// done.
    pub async fn await_shutdown(&self) -> Result<()> {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!(
                    component = "graceful-shutdown",
                    event = "os_signal",
                    signal = "SIGINT",
                    "cancellation started"
                );
            }
            _ = self.shutdown_token.cancelled() => {
                info!(
                    component = "graceful-shutdown",
                    event = "ctx_done",
                    "cancellation started"
                );
            }
        }

        self.shutdown_token.cancel();

        match timeout(self.timeout, self.wait_for_completion()).await {
            Ok(()) => {
                info!(
                    component = "graceful-shutdown",
                    event = "shutdown_success",
                    "service was gracefully shut down"
                );
                Ok(())
            }
            Err(_) => {
                warn!(
                    component = "graceful-shutdown",
                    event = "shutdown_timeout",
                    timeout_secs = self.timeout.as_secs(),
                    "not all tasks were closed within timeout"
                );
                Err(TimeoutError.into())
            }
        }
    }

    async fn wait_for_completion(&self) {
        let registered = self.registered.load(Ordering::SeqCst) as u32;
        if registered == 0 {
            return;
        }
        let _permits = self.done.acquire_many(registered).await;
    }
}
