//! Cache bucket storage: named buckets of response snapshots.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::model::{CacheKey, Response};

pub mod disk;
pub mod memory;

#[cfg(test)]
mod storage_test;

// Re-export main types
pub use disk::DiskStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("bucket io: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot decode: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid bucket name {0:?}")]
    InvalidName(String),
}

/// Options for a bucket lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchOptions {
    /// Ignore the query string on both the stored and the looked-up identity.
    pub ignore_query: bool,
}

/// A named bucket of stored responses.
///
/// Writes replace the whole snapshot for a key, last write wins; there is no
/// partial update to guard against.
#[async_trait]
pub trait Bucket: Send + Sync {
    /// Finds a stored snapshot by identity.
    async fn lookup(
        &self,
        key: &CacheKey,
        opts: MatchOptions,
    ) -> Result<Option<Response>, StorageError>;

    /// Stores a snapshot, overwriting any previous one for the identity.
    async fn put(&self, key: CacheKey, response: Response) -> Result<(), StorageError>;

    /// Removes one entry; false when it was not present.
    async fn delete(&self, key: &CacheKey) -> Result<bool, StorageError>;

    /// Identities of every stored entry.
    async fn keys(&self) -> Result<Vec<CacheKey>, StorageError>;
}

/// The collection of buckets the worker can see.
#[async_trait]
pub trait BucketStore: Send + Sync {
    /// Opens a bucket, creating it when absent.
    async fn open(&self, name: &str) -> Result<Arc<dyn Bucket>, StorageError>;

    /// Names of every existing bucket.
    async fn list(&self) -> Result<Vec<String>, StorageError>;

    /// Deletes a bucket with all of its entries; false when it did not exist.
    async fn delete(&self, name: &str) -> Result<bool, StorageError>;

    /// Whether a bucket exists, without creating it.
    async fn contains(&self, name: &str) -> Result<bool, StorageError>;
}
