//! Install phase: precache population.

use anyhow::{bail, Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::PrecachePolicy;
use crate::model::FetchRequest;
use crate::network::{FetchOptions, Network};
use crate::storage::{Bucket, BucketStore};

use super::WorkerCacheController;

impl WorkerCacheController {
    /// Populates the current bucket from the precache manifest.
    ///
    /// Every manifest URL is fetched with `reload` so the precache reflects
    /// the deployed version rather than an intermediate cache. Under the
    /// fail-open policy a failed entry is logged and skipped; under
    /// fail-closed any failure aborts the install and the previous version
    /// stays active.
    pub async fn handle_install(&self) -> Result<()> {
        self.lifecycle.begin_install();
        let policy = self.cfg.precache_policy();

        let bucket = match self.store.open(&self.cache_name).await {
            Ok(bucket) => bucket,
            Err(e) => {
                self.lifecycle.make_redundant();
                return Err(e).context("open precache bucket");
            }
        };

        // All entries are fetched concurrently; one slow icon must not
        // serialize the install.
        let results = futures::future::join_all(self.cfg.precache_assets().iter().map(|entry| {
            let bucket = bucket.clone();
            async move { (entry, self.precache_entry(&bucket, entry).await) }
        }))
        .await;

        let mut stored = 0usize;
        let mut skipped = 0usize;
        for (entry, outcome) in results {
            match outcome {
                Ok(()) => stored += 1,
                Err(e) => match policy {
                    PrecachePolicy::FailOpen => {
                        skipped += 1;
                        warn!(
                            component = "install",
                            event = "precache_skip",
                            entry = entry.as_str(),
                            error = %e,
                            "manifest entry skipped"
                        );
                    }
                    PrecachePolicy::FailClosed => {
                        self.lifecycle.make_redundant();
                        return Err(e)
                            .with_context(|| format!("precache manifest entry {entry:?}"));
                    }
                },
            }
        }

        info!(
            component = "install",
            event = "precache_complete",
            bucket = %self.cache_name,
            stored = stored,
            skipped = skipped,
            "precache populated"
        );
        self.lifecycle.install_complete();

        if self.cfg.skip_waiting_on_install() {
            self.lifecycle.request_skip_waiting();
        }
        Ok(())
    }

    /// Fetches one manifest entry from the origin and stores the snapshot.
    async fn precache_entry(&self, bucket: &Arc<dyn Bucket>, entry: &str) -> Result<()> {
        let url = self.base.resolve(entry)?;
        let request = FetchRequest::get(url);
        let response = self
            .network
            .fetch(&request, FetchOptions { reload: true })
            .await?;
        if !response.is_ok() {
            bail!("origin returned status {}", response.status);
        }
        bucket.put(request.cache_key(), response).await?;
        Ok(())
    }
}
