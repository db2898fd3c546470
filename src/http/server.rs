//! Gateway HTTP server: dispatches incoming requests into the worker
//! controller.

use anyhow::{Context, Result};
use axum::body::{to_bytes, Bytes};
use axum::extract::State;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::Response as AxumResponse;
use axum::routing::post;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::timeout::TimeoutLayer;
use tracing::{debug, info};
use url::Url;

use crate::config::Config;
use crate::controller::{FetchOutcome, WorkerCacheController};
use crate::model::FetchRequest;
use crate::network::Network;

use super::render;

/// Caps buffered request bodies on the passthrough path.
const MAX_PASSTHROUGH_BODY: usize = 16 * 1024 * 1024;
const DEFAULT_PORT: &str = "8030";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Server trait for gateway operations.
#[async_trait::async_trait]
pub trait Server: Send + Sync {
    /// Starts the server (blocking).
    async fn listen_and_serve(&self) -> Result<()>;
}

/// Hosts the worker controller behind an HTTP listener.
///
/// Every request under the scope becomes a fetch event; `/worker/message`
/// and `/worker/push` feed the control channels the hosting page would use.
pub struct GatewayServer {
    shutdown_token: CancellationToken,
    cfg: Config,
    state: Arc<Gateway>,
}

/// Shared request-handling state.
pub struct Gateway {
    controller: Arc<WorkerCacheController>,
    network: Arc<dyn Network>,
}

impl GatewayServer {
    pub fn new(
        shutdown_token: CancellationToken,
        cfg: Config,
        controller: Arc<WorkerCacheController>,
        network: Arc<dyn Network>,
    ) -> Self {
        Self {
            shutdown_token,
            cfg,
            state: Arc::new(Gateway {
                controller,
                network,
            }),
        }
    }

    fn build_router(&self) -> Router {
        let timeout = self
            .cfg
            .api()
            .and_then(|api| api.timeout)
            .unwrap_or(DEFAULT_TIMEOUT);
        Router::new()
            .route("/worker/message", post(message))
            .route("/worker/push", post(push))
            .fallback(fetch)
            .layer(TimeoutLayer::new(timeout))
            .with_state(self.state.clone())
    }
}

#[async_trait::async_trait]
impl Server for GatewayServer {
    async fn listen_and_serve(&self) -> Result<()> {
        let port = self
            .cfg
            .api()
            .and_then(|api| api.port.as_deref())
            .unwrap_or(DEFAULT_PORT);
        let port = port.trim_start_matches(':');
        let addr: SocketAddr = format!("0.0.0.0:{port}")
            .parse()
            .context("parse server address")?;

        let listener = TcpListener::bind(&addr)
            .await
            .context("bind tcp listener")?;
        info!(
            component = "server",
            event = "started",
            addr = %addr,
            "gateway listening"
        );

        let token = self.shutdown_token.clone();
        axum::serve(listener, self.build_router())
            .with_graceful_shutdown(async move { token.cancelled().await })
            .await
            .context("serve gateway")?;

        info!(component = "server", event = "stopped", "gateway stopped");
        Ok(())
    }
}

impl Gateway {
    /// Absolute request URL as the origin sees it: the scope origin plus the
    /// incoming path and query. Without a parseable scope, the Host header
    /// is the only origin hint left.
    fn request_url(&self, parts: &Parts) -> Option<Url> {
        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        if let Some(root) = self.controller.base().root_url() {
            return root.join(path_and_query).ok();
        }
        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())?;
        Url::parse(&format!("http://{host}{path_and_query}")).ok()
    }

    /// Forwards traffic the worker leaves alone. A transport failure maps to
    /// 502, the closest the gateway has to the browser surfacing its own
    /// network error.
    async fn passthrough(
        &self,
        method: &str,
        url: &Url,
        headers: &[(String, String)],
        body: Bytes,
    ) -> AxumResponse {
        let body = if body.is_empty() { None } else { Some(body) };
        match self.network.proxy(method, url, headers, body).await {
            Ok(response) => render::write_response(&response),
            Err(e) => {
                debug!(
                    component = "server",
                    event = "passthrough_failed",
                    url = %url,
                    error = %e,
                    "origin unreachable"
                );
                render::status_response(StatusCode::BAD_GATEWAY)
            }
        }
    }
}

/// Turns an incoming gateway request into a fetch event for the worker.
async fn fetch(State(gw): State<Arc<Gateway>>, request: axum::extract::Request) -> AxumResponse {
    let (parts, body) = request.into_parts();
    let body = match to_bytes(body, MAX_PASSTHROUGH_BODY).await {
        Ok(bytes) => bytes,
        Err(_) => return render::status_response(StatusCode::PAYLOAD_TOO_LARGE),
    };

    let Some(url) = gw.request_url(&parts) else {
        return render::status_response(StatusCode::BAD_REQUEST);
    };
    let headers = header_pairs(&parts.headers);

    // Before activation the worker does not intercept; traffic flows to the
    // origin untouched.
    if !gw.controller.lifecycle().can_intercept() {
        return gw
            .passthrough(parts.method.as_str(), &url, &headers, body)
            .await;
    }

    let mut fetch_request = FetchRequest::new(parts.method.as_str(), url.clone());
    fetch_request.navigation = is_navigation(&parts);

    match gw.controller.handle_fetch(&fetch_request).await {
        FetchOutcome::Handled(response) => render::write_response(&response),
        FetchOutcome::Passthrough => {
            gw.passthrough(parts.method.as_str(), &url, &headers, body)
                .await
        }
    }
}

/// Control channel: page-to-worker messages.
async fn message(State(gw): State<Arc<Gateway>>, body: Bytes) -> StatusCode {
    match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(value) => gw.controller.handle_message(&value),
        Err(_) => debug!(
            component = "server",
            event = "message_unparsable",
            "control message ignored"
        ),
    }
    StatusCode::NO_CONTENT
}

/// Control channel: push delivery.
async fn push(State(gw): State<Arc<Gateway>>, body: Bytes) -> StatusCode {
    let payload = if body.is_empty() {
        None
    } else {
        Some(body.as_ref())
    };
    gw.controller.handle_push(payload).await;
    StatusCode::NO_CONTENT
}

/// Top-level page load detection: the platform's navigate mode, approximated
/// from request headers.
fn is_navigation(parts: &Parts) -> bool {
    if let Some(mode) = parts
        .headers
        .get("sec-fetch-mode")
        .and_then(|v| v.to_str().ok())
    {
        return mode.eq_ignore_ascii_case("navigate");
    }
    parts.method == Method::GET
        && parts
            .headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .map(|accept| accept.contains("text/html"))
            .unwrap_or(false)
}

fn header_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(headers.len());
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            pairs.push((name.as_str().to_string(), value.to_string()));
        }
    }
    pairs
}
