//! Worker version lifecycle.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use tokio::sync::Notify;
use tracing::info;

/// States a worker version moves through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerState {
    Parsed = 0,
    Installing = 1,
    Installed = 2,
    Activating = 3,
    Activated = 4,
    Redundant = 5,
}

impl WorkerState {
    /// Only an activated worker intercepts fetches; anything earlier leaves
    /// requests to default handling.
    pub fn can_intercept(&self) -> bool {
        matches!(self, WorkerState::Activated)
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => WorkerState::Parsed,
            1 => WorkerState::Installing,
            2 => WorkerState::Installed,
            3 => WorkerState::Activating,
            4 => WorkerState::Activated,
            _ => WorkerState::Redundant,
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkerState::Parsed => "parsed",
            WorkerState::Installing => "installing",
            WorkerState::Installed => "installed",
            WorkerState::Activating => "activating",
            WorkerState::Activated => "activated",
            WorkerState::Redundant => "redundant",
        };
        f.write_str(name)
    }
}

/// Lifecycle of the worker version hosted by this process.
///
/// The host drives the transitions: install always completes before activate
/// begins, and fetch interception starts only once activation is done.
pub struct Lifecycle {
    state: AtomicU8,
    skip_waiting: AtomicBool,
    skip_notify: Notify,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(WorkerState::Parsed as u8),
            skip_waiting: AtomicBool::new(false),
            skip_notify: Notify::new(),
        }
    }

    pub fn state(&self) -> WorkerState {
        WorkerState::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub fn can_intercept(&self) -> bool {
        self.state().can_intercept()
    }

    fn transition(&self, to: WorkerState) {
        let from = WorkerState::from_u8(self.state.swap(to as u8, Ordering::SeqCst));
        info!(
            component = "lifecycle",
            event = "state_change",
            from = %from,
            to = %to,
            "worker state"
        );
    }

    pub fn begin_install(&self) {
        self.transition(WorkerState::Installing);
    }

    pub fn install_complete(&self) {
        self.transition(WorkerState::Installed);
    }

    pub fn begin_activate(&self) {
        self.transition(WorkerState::Activating);
    }

    pub fn activate_complete(&self) {
        self.transition(WorkerState::Activated);
    }

    pub fn make_redundant(&self) {
        self.transition(WorkerState::Redundant);
    }

    /// Requests immediate activation of a waiting worker.
    pub fn request_skip_waiting(&self) {
        self.skip_waiting.store(true, Ordering::SeqCst);
        self.skip_notify.notify_one();
    }

    pub fn skip_requested(&self) -> bool {
        self.skip_waiting.load(Ordering::SeqCst)
    }

    /// Resolves once skip-waiting has been requested, including when the
    /// request happened before the call.
    pub async fn wait_for_skip(&self) {
        loop {
            if self.skip_requested() {
                return;
            }
            self.skip_notify.notified().await;
        }
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
