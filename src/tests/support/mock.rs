//! Scripted platform seams for tests.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

use crate::clients::ClientRegistry;
use crate::model::{FetchRequest, Response};
use crate::network::{FetchOptions, Network, NetworkError};
use crate::notify::{Notification, Notifier};

/// One scripted origin behavior for a URL.
#[derive(Clone)]
pub struct ScriptedResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub delay: Option<Duration>,
}

impl ScriptedResponse {
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            body: body.as_bytes().to_vec(),
            delay: None,
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.as_bytes().to_vec(),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Origin double: URL to scripted response. Unscripted URLs and a downed
/// origin fail the way an unreachable network does.
#[derive(Default)]
pub struct MockNetwork {
    routes: Mutex<HashMap<String, ScriptedResponse>>,
    down: AtomicBool,
    fetches: AtomicUsize,
    reload_fetches: AtomicUsize,
}

impl MockNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, url: &str, response: ScriptedResponse) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Fetches that carried the cache-bypassing reload option.
    pub fn reload_count(&self) -> usize {
        self.reload_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Network for MockNetwork {
    async fn fetch(
        &self,
        request: &FetchRequest,
        opts: FetchOptions,
    ) -> Result<Response, NetworkError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if opts.reload {
            self.reload_fetches.fetch_add(1, Ordering::SeqCst);
        }
        if self.down.load(Ordering::SeqCst) {
            return Err(NetworkError::Transport("origin down".to_string()));
        }

        let scripted = self
            .routes
            .lock()
            .unwrap()
            .get(request.url.as_str())
            .cloned();
        let Some(scripted) = scripted else {
            return Err(NetworkError::Transport(format!(
                "no route for {}",
                request.url
            )));
        };

        if let Some(delay) = scripted.delay {
            tokio::time::sleep(delay).await;
        }

        let status_text = if scripted.status == 200 { "OK" } else { "" };
        Ok(Response::new(
            scripted.status,
            status_text,
            vec![("content-type".to_string(), "text/plain".to_string())],
            Bytes::from(scripted.body),
        ))
    }

    async fn proxy(
        &self,
        _method: &str,
        url: &Url,
        _headers: &[(String, String)],
        _body: Option<Bytes>,
    ) -> Result<Response, NetworkError> {
        // Tests route proxying through the same script table.
        let request = FetchRequest::get(url.clone());
        self.fetch(&request, FetchOptions::default()).await
    }
}

/// Records claims and opened windows.
#[derive(Default)]
pub struct MockClients {
    pub claims: AtomicUsize,
    pub opened: Mutex<Vec<Url>>,
}

#[async_trait]
impl ClientRegistry for MockClients {
    async fn claim(&self) -> anyhow::Result<()> {
        self.claims.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn open_window(&self, url: &Url) -> anyhow::Result<()> {
        self.opened.lock().unwrap().push(url.clone());
        Ok(())
    }
}

/// Records shown notifications and close calls.
#[derive(Default)]
pub struct MockNotifier {
    pub shown: Mutex<Vec<Notification>>,
    pub closed: AtomicUsize,
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn show(&self, notification: &Notification) -> anyhow::Result<()> {
        self.shown.lock().unwrap().push(notification.clone());
        Ok(())
    }

    async fn close(&self) -> anyhow::Result<()> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
