// Controller harness over in-memory storage and scripted seams.

use std::sync::Arc;

use crate::clients::ClientRegistry;
use crate::config::test_config::new_test_config;
use crate::config::Config;
use crate::controller::WorkerCacheController;
use crate::lifecycle::Lifecycle;
use crate::network::Network;
use crate::notify::Notifier;
use crate::storage::{BucketStore, MemoryStore};

use super::mock::{MockClients, MockNetwork, MockNotifier, ScriptedResponse};

/// Everything a test needs to drive the controller and observe the seams.
pub struct Harness {
    pub controller: WorkerCacheController,
    pub store: Arc<MemoryStore>,
    pub network: Arc<MockNetwork>,
    pub clients: Arc<MockClients>,
    pub notifier: Arc<MockNotifier>,
    pub cfg: Config,
}

impl Harness {
    /// Harness over the default test config with every manifest entry
    /// scripted to succeed.
    pub fn precached() -> Self {
        let harness = Self::new(new_test_config());
        harness.script_manifest_ok();
        harness
    }

    pub fn new(cfg: Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        let network = Arc::new(MockNetwork::new());
        let clients = Arc::new(MockClients::default());
        let notifier = Arc::new(MockNotifier::default());
        let controller = WorkerCacheController::new(
            Arc::new(cfg.clone()),
            store.clone() as Arc<dyn BucketStore>,
            network.clone() as Arc<dyn Network>,
            clients.clone() as Arc<dyn ClientRegistry>,
            notifier.clone() as Arc<dyn Notifier>,
            Arc::new(Lifecycle::new()),
        );
        Self {
            controller,
            store,
            network,
            clients,
            notifier,
            cfg,
        }
    }

    /// Scripts a distinct 200 response for every precache manifest entry.
    pub fn script_manifest_ok(&self) {
        let base = self.cfg.base_path();
        for entry in self.cfg.precache_assets() {
            let url = base.resolve(entry).unwrap();
            self.network
                .script(url.as_str(), ScriptedResponse::ok(&format!("body of {entry}")));
        }
    }

    /// Absolute URL inside the scope.
    pub fn url(&self, path: &str) -> url::Url {
        self.cfg.base_path().resolve(path).unwrap()
    }
}
