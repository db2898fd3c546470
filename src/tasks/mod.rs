//! Detached background work, tracked so it can be awaited.

use std::future::Future;
use tokio_util::task::TaskTracker;

/// Tracks cache-mutating work detached from an event handler.
///
/// This is the keep-alive contract of the hosting platform: work spawned from
/// a handler must outlive the handler, and the host drains the tracker before
/// recycling the worker. Tests drain to reach quiescence deterministically.
#[derive(Clone)]
pub struct BackgroundTasks {
    tracker: TaskTracker,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self {
            tracker: TaskTracker::new(),
        }
    }

    /// Detaches work whose lifetime extends past the handler that spawned it.
    pub fn extend<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tracker.spawn(fut);
    }

    /// Number of tasks still running.
    pub fn len(&self) -> usize {
        self.tracker.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracker.is_empty()
    }

    /// Waits for every tracked task to finish, then accepts new work again.
    pub async fn drain(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }
}

impl Default for BackgroundTasks {
    fn default() -> Self {
        Self::new()
    }
}
