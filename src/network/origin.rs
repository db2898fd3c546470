//! Hyper-based origin client.

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request, Uri};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

use crate::model::{FetchRequest, Response};

use super::{FetchOptions, Network, NetworkError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection-oriented headers that must not be stored or replayed.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

type HyperClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Pooled HTTP/1.1 client, TLS via native roots.
pub struct OriginClient {
    client: HyperClient,
    timeout: Duration,
}

impl OriginClient {
    pub fn new(request_timeout: Duration) -> anyhow::Result<Self> {
        let mut connector = HttpConnector::new();
        connector.enforce_http(false);
        connector.set_nodelay(true);
        connector.set_keepalive(Some(POOL_IDLE_TIMEOUT));
        connector.set_connect_timeout(Some(CONNECT_TIMEOUT));

        let tls = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()?
            .https_or_http()
            .enable_http1()
            .wrap_connector(connector);

        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(POOL_IDLE_TIMEOUT)
            .build(tls);

        Ok(Self {
            client,
            timeout: request_timeout,
        })
    }

    async fn dispatch(
        &self,
        method: Method,
        url: &Url,
        headers: &[(String, String)],
        body: Bytes,
    ) -> Result<Response, NetworkError> {
        let uri: Uri = url
            .as_str()
            .parse()
            .map_err(|_| NetworkError::InvalidUrl(url.to_string()))?;

        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            if name.eq_ignore_ascii_case("host") || name.eq_ignore_ascii_case("content-length") {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }
        let request = builder
            .body(Full::new(body))
            .map_err(|e| NetworkError::Transport(e.to_string()))?;

        let response = match timeout(self.timeout, self.client.request(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(NetworkError::Transport(e.to_string())),
            Err(_) => return Err(NetworkError::Timeout(self.timeout)),
        };

        let status = response.status();
        let mut response_headers = Vec::with_capacity(response.headers().len());
        for (name, value) in response.headers() {
            if HOP_BY_HOP.contains(&name.as_str()) {
                continue;
            }
            if let Ok(value) = value.to_str() {
                response_headers.push((name.as_str().to_string(), value.to_string()));
            }
        }

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| NetworkError::Transport(e.to_string()))?
            .to_bytes();

        Ok(Response::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            response_headers,
            body,
        ))
    }
}

#[async_trait]
impl Network for OriginClient {
    async fn fetch(
        &self,
        request: &FetchRequest,
        opts: FetchOptions,
    ) -> Result<Response, NetworkError> {
        let method = request
            .method
            .parse::<Method>()
            .map_err(|_| NetworkError::Transport(format!("bad method {:?}", request.method)))?;

        let mut headers = Vec::new();
        if opts.reload {
            // Force revalidation the whole way to the origin.
            headers.push(("cache-control".to_string(), "no-cache".to_string()));
            headers.push(("pragma".to_string(), "no-cache".to_string()));
        }

        self.dispatch(method, &request.url, &headers, Bytes::new()).await
    }

    async fn proxy(
        &self,
        method: &str,
        url: &Url,
        headers: &[(String, String)],
        body: Option<Bytes>,
    ) -> Result<Response, NetworkError> {
        let method = method
            .parse::<Method>()
            .map_err(|_| NetworkError::Transport(format!("bad method {method:?}")))?;
        self.dispatch(method, url, headers, body.unwrap_or_default()).await
    }
}
