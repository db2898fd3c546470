//! Origin network access.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::model::{FetchRequest, Response};

pub mod origin;

// Re-export main types
pub use origin::OriginClient;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("invalid request url {0:?}")]
    InvalidUrl(String),
    #[error("transport: {0}")]
    Transport(String),
}

/// Options for a single origin fetch.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchOptions {
    /// Bypass intermediate caches and revalidate from the origin, so what
    /// lands in the precache reflects the deployed version.
    pub reload: bool,
}

/// Reachability seam to the origin.
///
/// An `Err` means the origin was not reachable at all; HTTP error statuses
/// come back as ordinary responses.
#[async_trait]
pub trait Network: Send + Sync {
    /// Fetches an intercepted request from the origin.
    async fn fetch(
        &self,
        request: &FetchRequest,
        opts: FetchOptions,
    ) -> Result<Response, NetworkError>;

    /// Forwards a request verbatim, for traffic the worker does not handle.
    async fn proxy(
        &self,
        method: &str,
        url: &Url,
        headers: &[(String, String)],
        body: Option<Bytes>,
    ) -> Result<Response, NetworkError>;
}
