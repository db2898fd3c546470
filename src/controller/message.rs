//! Control message handling.

use serde_json::Value;
use tracing::{debug, info};

use super::WorkerCacheController;

/// The only recognized control message type.
pub const MSG_SKIP_WAITING: &str = "SKIP_WAITING";

impl WorkerCacheController {
    /// Applies a control message from a hosting page.
    ///
    /// Unknown shapes are ignored silently, which keeps the channel
    /// forward-compatible.
    pub fn handle_message(&self, data: &Value) {
        match data.get("type").and_then(Value::as_str) {
            Some(MSG_SKIP_WAITING) => {
                info!(
                    component = "message",
                    event = "skip_waiting",
                    "immediate activation requested"
                );
                self.lifecycle.request_skip_waiting();
            }
            _ => {
                debug!(
                    component = "message",
                    event = "ignored",
                    "unrecognized message shape"
                );
            }
        }
    }
}
