// Worker cache controller: lifecycle, routing and control handlers over
// injected platform seams.

mod activate;
mod fetch;
mod install;
mod message;
mod push;

// Re-export main types
pub use fetch::FetchOutcome;
pub use message::MSG_SKIP_WAITING;

use std::sync::Arc;

use crate::clients::ClientRegistry;
use crate::config::Config;
use crate::lifecycle::Lifecycle;
use crate::model::CacheKey;
use crate::network::Network;
use crate::notify::Notifier;
use crate::scope::BasePath;
use crate::storage::BucketStore;
use crate::tasks::BackgroundTasks;

/// Owns the versioned bucket and implements the caching and interception
/// policy.
///
/// Every platform concern is injected (bucket store, origin network, client
/// registry, notifier), so the controller carries no ambient state and is
/// testable in isolation.
pub struct WorkerCacheController {
    cfg: Arc<Config>,
    base: BasePath,
    cache_name: String,
    store: Arc<dyn BucketStore>,
    network: Arc<dyn Network>,
    clients: Arc<dyn ClientRegistry>,
    notifier: Arc<dyn Notifier>,
    lifecycle: Arc<Lifecycle>,
    tasks: BackgroundTasks,
}

impl WorkerCacheController {
    pub fn new(
        cfg: Arc<Config>,
        store: Arc<dyn BucketStore>,
        network: Arc<dyn Network>,
        clients: Arc<dyn ClientRegistry>,
        notifier: Arc<dyn Notifier>,
        lifecycle: Arc<Lifecycle>,
    ) -> Self {
        let base = cfg.base_path();
        let cache_name = cfg.cache_name();
        Self {
            cfg,
            base,
            cache_name,
            store,
            network,
            clients,
            notifier,
            lifecycle,
            tasks: BackgroundTasks::new(),
        }
    }

    pub fn lifecycle(&self) -> &Arc<Lifecycle> {
        &self.lifecycle
    }

    /// Detached work spawned by handlers; drain to reach quiescence.
    pub fn tasks(&self) -> &BackgroundTasks {
        &self.tasks
    }

    pub fn base(&self) -> &BasePath {
        &self.base
    }

    /// Name of the bucket this version reads and writes.
    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    /// Identity of the cached app-shell document, when the scope allows
    /// resolving it.
    pub(crate) fn shell_key(&self) -> Option<CacheKey> {
        self.base
            .resolve(self.cfg.shell_asset())
            .ok()
            .map(|url| CacheKey::get(&url))
    }
}
