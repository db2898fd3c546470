//! In-memory bucket store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::model::{CacheKey, Response};

use super::{Bucket, BucketStore, MatchOptions, StorageError};

/// Process-local store; contents do not survive a restart.
#[derive(Default)]
pub struct MemoryStore {
    buckets: RwLock<HashMap<String, Arc<MemoryBucket>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BucketStore for MemoryStore {
    async fn open(&self, name: &str) -> Result<Arc<dyn Bucket>, StorageError> {
        let mut buckets = self.buckets.write().await;
        let bucket = buckets
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(MemoryBucket::default()))
            .clone();
        Ok(bucket)
    }

    async fn list(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.buckets.read().await.keys().cloned().collect())
    }

    async fn delete(&self, name: &str) -> Result<bool, StorageError> {
        Ok(self.buckets.write().await.remove(name).is_some())
    }

    async fn contains(&self, name: &str) -> Result<bool, StorageError> {
        Ok(self.buckets.read().await.contains_key(name))
    }
}

/// One named bucket over a locked map.
#[derive(Default)]
pub struct MemoryBucket {
    entries: RwLock<HashMap<CacheKey, Response>>,
}

#[async_trait]
impl Bucket for MemoryBucket {
    async fn lookup(
        &self,
        key: &CacheKey,
        opts: MatchOptions,
    ) -> Result<Option<Response>, StorageError> {
        let entries = self.entries.read().await;
        if let Some(found) = entries.get(key) {
            return Ok(Some(found.clone()));
        }
        if opts.ignore_query {
            let wanted = key.without_query();
            for (stored, response) in entries.iter() {
                if stored.without_query() == wanted {
                    return Ok(Some(response.clone()));
                }
            }
        }
        Ok(None)
    }

    async fn put(&self, key: CacheKey, response: Response) -> Result<(), StorageError> {
        self.entries.write().await.insert(key, response);
        Ok(())
    }

    async fn delete(&self, key: &CacheKey) -> Result<bool, StorageError> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn keys(&self) -> Result<Vec<CacheKey>, StorageError> {
        Ok(self.entries.read().await.keys().cloned().collect())
    }
}
