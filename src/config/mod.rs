// Configuration loading and management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

use crate::scope::{BasePath, ScopeError};

pub const PROD: &str = "prod";
#[allow(dead_code)]
pub const DEV: &str = "dev";
#[allow(dead_code)]
pub const TEST: &str = "test";

/// App shell document served as the offline navigation fallback.
pub const DEFAULT_SHELL_ASSET: &str = "index.html";

const DEFAULT_PUSH_TITLE: &str = "Update available";
const DEFAULT_PUSH_BODY: &str = "New content is ready in the app.";
const DEFAULT_STORAGE_DIR: &str = "public/buckets";

#[cfg(test)]
pub mod test_config;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(rename = "worker")]
    pub worker: WorkerBox,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkerBox {
    pub env: String,
    pub logs: Option<Logs>,
    pub api: Option<Api>,
    /// Registration scope: the absolute URL prefix the worker may intercept.
    pub scope: String,
    pub cache: CacheNaming,
    pub precache: Precache,
    pub origin: Option<Origin>,
    pub push: Option<Push>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Logs {
    pub level: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Api {
    pub name: Option<String>,
    pub port: Option<String>,
    #[serde(with = "humantime_serde", default)]
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheNaming {
    /// Bucket name prefix shared by every version of this worker.
    pub prefix: String,
    /// Version token; prefix + version names the current bucket.
    pub version: String,
    pub storage: Option<StorageCfg>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageCfg {
    pub kind: Option<StorageKind>,
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Memory,
    Disk,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Precache {
    /// Relative asset paths resolved against the scope directory.
    pub assets: Vec<String>,
    pub policy: Option<PrecachePolicy>,
    pub shell: Option<String>,
    /// Request skip-waiting right after a successful install.
    pub skip_waiting: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrecachePolicy {
    /// A failed manifest entry is logged and skipped; install completes.
    FailOpen,
    /// Any failed manifest entry aborts the install; the previous version
    /// stays active.
    FailClosed,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Origin {
    #[serde(with = "humantime_serde", default)]
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Push {
    pub title: Option<String>,
    pub body: Option<String>,
    pub icon: Option<String>,
    pub badge: Option<String>,
}

impl Config {
    /// Loads and validates the configuration struct from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("read config {:?}", path.as_ref()))?;
        let cfg: Config = serde_yaml::from_str(&raw).context("parse config yaml")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Rejects configurations the worker could not serve: a precache entry
    /// escaping the scope is a configuration error. An unparsable scope only
    /// degrades to the permissive base, so unresolvable entries are logged
    /// rather than fatal.
    pub fn validate(&self) -> Result<()> {
        let base = self.base_path();
        for entry in self.precache_assets() {
            match base.resolve(entry) {
                Ok(_) => {}
                Err(e @ ScopeError::OutOfScope { .. }) => {
                    return Err(e).with_context(|| format!("precache manifest entry {entry:?}"));
                }
                Err(ScopeError::Unresolvable { .. }) => {
                    warn!(
                        component = "config",
                        event = "entry_unresolvable",
                        entry = entry.as_str(),
                        "manifest entry skipped at install time"
                    );
                }
            }
        }
        Ok(())
    }

    pub fn is_prod(&self) -> bool {
        self.worker.env == PROD
    }

    pub fn logs(&self) -> Option<&Logs> {
        self.worker.logs.as_ref()
    }

    pub fn api(&self) -> Option<&Api> {
        self.worker.api.as_ref()
    }

    pub fn scope(&self) -> &str {
        &self.worker.scope
    }

    /// Base path derived from the registration scope.
    pub fn base_path(&self) -> BasePath {
        BasePath::from_scope(&self.worker.scope)
    }

    pub fn cache_prefix(&self) -> &str {
        &self.worker.cache.prefix
    }

    /// Name of the current version's bucket.
    pub fn cache_name(&self) -> String {
        format!("{}{}", self.worker.cache.prefix, self.worker.cache.version)
    }

    pub fn storage_kind(&self) -> StorageKind {
        self.worker
            .cache
            .storage
            .as_ref()
            .and_then(|s| s.kind)
            .unwrap_or(StorageKind::Memory)
    }

    pub fn storage_dir(&self) -> &str {
        self.worker
            .cache
            .storage
            .as_ref()
            .and_then(|s| s.dir.as_deref())
            .unwrap_or(DEFAULT_STORAGE_DIR)
    }

    pub fn precache_assets(&self) -> &[String] {
        &self.worker.precache.assets
    }

    pub fn precache_policy(&self) -> PrecachePolicy {
        self.worker.precache.policy.unwrap_or(PrecachePolicy::FailOpen)
    }

    pub fn shell_asset(&self) -> &str {
        self.worker
            .precache
            .shell
            .as_deref()
            .unwrap_or(DEFAULT_SHELL_ASSET)
    }

    pub fn skip_waiting_on_install(&self) -> bool {
        self.worker.precache.skip_waiting.unwrap_or(true)
    }

    pub fn origin_timeout(&self) -> Duration {
        self.worker
            .origin
            .as_ref()
            .and_then(|o| o.timeout)
            .unwrap_or(crate::network::origin::DEFAULT_TIMEOUT)
    }

    pub fn push_title(&self) -> &str {
        self.worker
            .push
            .as_ref()
            .and_then(|p| p.title.as_deref())
            .unwrap_or(DEFAULT_PUSH_TITLE)
    }

    pub fn push_body(&self) -> &str {
        self.worker
            .push
            .as_ref()
            .and_then(|p| p.body.as_deref())
            .unwrap_or(DEFAULT_PUSH_BODY)
    }

    pub fn push_icon(&self) -> Option<&str> {
        self.worker.push.as_ref().and_then(|p| p.icon.as_deref())
    }

    /// Badge falls back to the icon when not set separately.
    pub fn push_badge(&self) -> Option<&str> {
        self.worker
            .push
            .as_ref()
            .and_then(|p| p.badge.as_deref().or(p.icon.as_deref()))
    }
}
