//! Disk-backed bucket store.
//!
//! Layout: one directory per bucket under the root; one snapshot per entry,
//! split into a JSON meta file and a raw body file sharing a hashed stem.
//! The meta file is written last and is the commit marker for the entry.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;

use crate::model::{CacheKey, Response};

use super::{Bucket, BucketStore, MatchOptions, StorageError};

const META_SUFFIX: &str = ".meta.json";
const BODY_SUFFIX: &str = ".body";

/// Store rooted at a directory. Buckets survive process restarts, which is
/// what makes eviction at activation observable across version upgrades.
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn bucket_dir(&self, name: &str) -> Result<PathBuf, StorageError> {
        let valid = !name.is_empty()
            && !name.starts_with('.')
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !valid {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl BucketStore for DiskStore {
    async fn open(&self, name: &str) -> Result<Arc<dyn Bucket>, StorageError> {
        let dir = self.bucket_dir(name)?;
        fs::create_dir_all(&dir).await?;
        Ok(Arc::new(DiskBucket { dir }))
    }

    async fn list(&self) -> Result<Vec<String>, StorageError> {
        let mut names = Vec::new();
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                if let Ok(name) = entry.file_name().into_string() {
                    names.push(name);
                }
            }
        }
        Ok(names)
    }

    async fn delete(&self, name: &str) -> Result<bool, StorageError> {
        let dir = self.bucket_dir(name)?;
        match fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn contains(&self, name: &str) -> Result<bool, StorageError> {
        let dir = self.bucket_dir(name)?;
        Ok(fs::try_exists(dir).await?)
    }
}

/// Serialized entry metadata; the body lives in the sibling body file.
#[derive(Serialize, Deserialize)]
struct Meta {
    key: CacheKey,
    status: u16,
    status_text: String,
    headers: Vec<(String, String)>,
    stored_at: DateTime<Utc>,
}

/// One bucket directory.
pub struct DiskBucket {
    dir: PathBuf,
}

impl DiskBucket {
    fn stem(key: &CacheKey) -> String {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }

    fn meta_path(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{stem}{META_SUFFIX}"))
    }

    fn body_path(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{stem}{BODY_SUFFIX}"))
    }

    async fn read_entry(&self, stem: &str) -> Result<Option<(CacheKey, Response)>, StorageError> {
        let raw = match fs::read(self.meta_path(stem)).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let meta: Meta = serde_json::from_slice(&raw)?;
        let body = match fs::read(self.body_path(stem)).await {
            Ok(body) => body,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        let response = Response {
            status: meta.status,
            status_text: meta.status_text,
            headers: meta.headers,
            body: Bytes::from(body),
            stored_at: meta.stored_at,
        };
        Ok(Some((meta.key, response)))
    }

    /// Stems of every committed entry in the bucket.
    async fn stems(&self) -> Result<Vec<String>, StorageError> {
        let mut stems = Vec::new();
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(stems),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            if let Ok(name) = entry.file_name().into_string() {
                if let Some(stem) = name.strip_suffix(META_SUFFIX) {
                    stems.push(stem.to_string());
                }
            }
        }
        Ok(stems)
    }
}

#[async_trait]
impl Bucket for DiskBucket {
    async fn lookup(
        &self,
        key: &CacheKey,
        opts: MatchOptions,
    ) -> Result<Option<Response>, StorageError> {
        let stem = Self::stem(key);
        if let Some((stored, response)) = self.read_entry(&stem).await? {
            // A hash collision with a different identity counts as a miss.
            if stored == *key {
                return Ok(Some(response));
            }
        }
        if opts.ignore_query {
            let wanted = key.without_query();
            for stem in self.stems().await? {
                if let Some((stored, response)) = self.read_entry(&stem).await? {
                    if stored.without_query() == wanted {
                        return Ok(Some(response));
                    }
                }
            }
        }
        Ok(None)
    }

    async fn put(&self, key: CacheKey, response: Response) -> Result<(), StorageError> {
        let stem = Self::stem(&key);
        fs::write(self.body_path(&stem), &response.body).await?;
        let meta = Meta {
            key,
            status: response.status,
            status_text: response.status_text,
            headers: response.headers,
            stored_at: response.stored_at,
        };
        fs::write(self.meta_path(&stem), serde_json::to_vec(&meta)?).await?;
        Ok(())
    }

    async fn delete(&self, key: &CacheKey) -> Result<bool, StorageError> {
        let stem = Self::stem(key);
        let found = match fs::remove_file(self.meta_path(&stem)).await {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };
        match fs::remove_file(self.body_path(&stem)).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Ok(found)
    }

    async fn keys(&self) -> Result<Vec<CacheKey>, StorageError> {
        let mut keys = Vec::new();
        for stem in self.stems().await? {
            if let Some((key, _)) = self.read_entry(&stem).await? {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}
