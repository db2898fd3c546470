//! Stored response snapshots.

use bytes::Bytes;
use chrono::{DateTime, Utc};

/// Snapshot of a network response: status, headers, body.
///
/// Stored whole and overwritten whole; a bucket entry is never patched in
/// place. `stored_at` records when the snapshot was taken.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
    pub stored_at: DateTime<Utc>,
}

impl Response {
    pub fn new(status: u16, status_text: &str, headers: Vec<(String, String)>, body: Bytes) -> Self {
        Self {
            status,
            status_text: status_text.to_string(),
            headers,
            body,
            stored_at: Utc::now(),
        }
    }

    /// Success in the 2xx sense, the only responses worth caching.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Duplicates the response so one copy can go to the cache while the
    /// other goes to the caller. Transport bodies are consumed exactly once,
    /// so every dual use must pass through here.
    pub fn snapshot(&self) -> Self {
        Self {
            status: self.status,
            status_text: self.status_text.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
            stored_at: Utc::now(),
        }
    }

    /// First header value with the given name, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Synthetic fallback for a navigation with neither network nor a cached
    /// shell.
    pub fn offline_navigation() -> Self {
        Self::new(503, "Offline", Vec::new(), Bytes::from_static(b"Offline"))
    }

    /// Synthetic fallback for a static asset with no cache entry and no
    /// reachable origin.
    pub fn offline_asset() -> Self {
        Self::new(504, "Offline", Vec::new(), Bytes::new())
    }
}
