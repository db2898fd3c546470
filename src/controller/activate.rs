//! Activate phase: stale-bucket eviction and client claim.

use anyhow::Result;
use tracing::{info, warn};

use crate::clients::ClientRegistry;
use crate::storage::BucketStore;

use super::WorkerCacheController;

impl WorkerCacheController {
    /// Deletes every bucket sharing the configured prefix except the current
    /// version's, then takes control of open clients.
    ///
    /// Buckets under other prefixes are never touched. A deletion failure is
    /// logged and retried at the next activation; it never blocks the claim.
    /// Idempotent: with no stale buckets this performs no deletions.
    pub async fn handle_activate(&self) -> Result<()> {
        self.lifecycle.begin_activate();

        let prefix = self.cfg.cache_prefix();
        match self.store.list().await {
            Ok(names) => {
                let mut evicted = 0usize;
                for name in names {
                    if !name.starts_with(prefix) || name == self.cache_name {
                        continue;
                    }
                    match self.store.delete(&name).await {
                        Ok(true) => {
                            evicted += 1;
                            info!(
                                component = "activate",
                                event = "bucket_evicted",
                                bucket = %name,
                                "stale bucket deleted"
                            );
                        }
                        Ok(false) => {}
                        Err(e) => {
                            warn!(
                                component = "activate",
                                event = "evict_failed",
                                bucket = %name,
                                error = %e,
                                "stale bucket survives until next activation"
                            );
                        }
                    }
                }
                if evicted > 0 {
                    info!(
                        component = "activate",
                        event = "eviction_complete",
                        evicted = evicted,
                        current = %self.cache_name,
                        "eviction finished"
                    );
                }
            }
            Err(e) => {
                warn!(
                    component = "activate",
                    event = "list_failed",
                    error = %e,
                    "bucket enumeration failed; eviction deferred"
                );
            }
        }

        if let Err(e) = self.clients.claim().await {
            warn!(
                component = "activate",
                event = "claim_failed",
                error = %e,
                "client claim failed"
            );
        }

        self.lifecycle.activate_complete();
        Ok(())
    }
}
