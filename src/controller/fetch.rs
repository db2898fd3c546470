//! Fetch interception: the steady-state routing policy.

use tracing::debug;

use crate::model::{classify, FetchRequest, RequestClass, Response};
use crate::network::{FetchOptions, Network};
use crate::storage::{Bucket, BucketStore, MatchOptions};

use super::WorkerCacheController;

/// What the worker decided for one intercepted request.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The worker produced the response.
    Handled(Response),
    /// Out-of-scope or non-GET traffic, left to default handling.
    Passthrough,
}

impl WorkerCacheController {
    /// Routes one request. Never fails: the worst case is a synthetic
    /// offline response.
    pub async fn handle_fetch(&self, request: &FetchRequest) -> FetchOutcome {
        match classify(request, &self.base) {
            RequestClass::NonGet | RequestClass::OutOfScope => FetchOutcome::Passthrough,
            RequestClass::Navigation => {
                FetchOutcome::Handled(self.route_navigation(request).await)
            }
            RequestClass::StaticAsset => {
                FetchOutcome::Handled(self.route_static_asset(request).await)
            }
        }
    }

    /// Network-first: a fresh shell when online, the cached shell when not.
    async fn route_navigation(&self, request: &FetchRequest) -> Response {
        match self.network.fetch(request, FetchOptions::default()).await {
            Ok(response) => {
                self.refresh_shell(response.snapshot());
                response
            }
            Err(e) => {
                debug!(
                    component = "fetch",
                    event = "navigation_offline",
                    url = %request.url,
                    error = %e,
                    "falling back to cached shell"
                );
                self.shell_fallback().await
            }
        }
    }

    /// Refreshes the cached app-shell document without blocking the caller.
    fn refresh_shell(&self, snapshot: Response) {
        let Some(key) = self.shell_key() else { return };
        let store = self.store.clone();
        let cache_name = self.cache_name.clone();
        self.tasks.extend(async move {
            let bucket = match store.open(&cache_name).await {
                Ok(bucket) => bucket,
                Err(e) => {
                    debug!(
                        component = "fetch",
                        event = "shell_refresh_failed",
                        error = %e,
                        "bucket open failed"
                    );
                    return;
                }
            };
            if let Err(e) = bucket.put(key, snapshot).await {
                debug!(
                    component = "fetch",
                    event = "shell_refresh_failed",
                    error = %e,
                    "shell snapshot not stored"
                );
            }
        });
    }

    /// The cached shell, else the synthetic offline page.
    async fn shell_fallback(&self) -> Response {
        if let Some(key) = self.shell_key() {
            if let Ok(bucket) = self.store.open(&self.cache_name).await {
                match bucket.lookup(&key, MatchOptions::default()).await {
                    Ok(Some(shell)) => return shell,
                    Ok(None) => {}
                    Err(e) => {
                        debug!(
                            component = "fetch",
                            event = "shell_lookup_failed",
                            error = %e,
                            "shell lookup failed"
                        );
                    }
                }
            }
        }
        Response::offline_navigation()
    }

    /// Cache-first with background revalidation.
    async fn route_static_asset(&self, request: &FetchRequest) -> Response {
        let key = request.cache_key();

        let bucket = match self.store.open(&self.cache_name).await {
            Ok(bucket) => bucket,
            Err(e) => {
                debug!(
                    component = "fetch",
                    event = "bucket_open_failed",
                    error = %e,
                    "serving from network only"
                );
                return match self.network.fetch(request, FetchOptions::default()).await {
                    Ok(response) => response,
                    Err(_) => Response::offline_asset(),
                };
            }
        };

        let cached = bucket
            .lookup(&key, MatchOptions::default())
            .await
            .unwrap_or_else(|e| {
                debug!(
                    component = "fetch",
                    event = "lookup_failed",
                    key = %key,
                    error = %e,
                    "treating as miss"
                );
                None
            });

        if let Some(cached) = cached {
            // Revalidate behind the response; refresh errors are swallowed.
            let network = self.network.clone();
            let request = request.clone();
            let bucket = bucket.clone();
            let key = key.clone();
            self.tasks.extend(async move {
                match network.fetch(&request, FetchOptions::default()).await {
                    Ok(response) if response.is_ok() => {
                        let _ = bucket.put(key, response).await;
                    }
                    Ok(_) | Err(_) => {}
                }
            });
            return cached;
        }

        match self.network.fetch(request, FetchOptions::default()).await {
            Ok(response) => {
                if response.is_ok() {
                    if let Err(e) = bucket.put(key, response.snapshot()).await {
                        debug!(
                            component = "fetch",
                            event = "store_failed",
                            error = %e,
                            "asset snapshot not stored"
                        );
                    }
                }
                response
            }
            Err(e) => {
                debug!(
                    component = "fetch",
                    event = "asset_offline",
                    url = %request.url,
                    error = %e,
                    "no network; rechecking cache"
                );
                // A background refresh may have landed the entry since the
                // first lookup.
                match bucket.lookup(&key, MatchOptions::default()).await {
                    Ok(Some(cached)) => cached,
                    _ => Response::offline_asset(),
                }
            }
        }
    }
}
