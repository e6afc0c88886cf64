//! Object store capability

use async_trait::async_trait;
use bytes::Bytes;
use filegate_core::{Result, StorageKey};
use tracing::debug;

/// Keys returned by one listing call, matching the S3 `MaxKeys` default
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Abstract object store the gateway services run against.
///
/// One handle is created at startup and shared by every request, so
/// implementations must be safe to call concurrently.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Bucket this handle reads and writes
    fn bucket(&self) -> &str;

    /// Write `body` under `key` with public-read access and return a URL for
    /// the object. Fails with `ErrorKind::Upload`.
    async fn put(&self, key: &StorageKey, body: Bytes) -> Result<String>;

    /// Delete one object. Deleting a missing key succeeds. Fails with
    /// `ErrorKind::Delete`.
    async fn delete(&self, key: &StorageKey) -> Result<()>;

    /// List keys starting with `prefix`, in key order. Fails with
    /// `ErrorKind::List`.
    async fn list_by_prefix(&self, prefix: &StorageKey) -> Result<Vec<StorageKey>>;

    /// Delete `keys` one at a time, in order.
    ///
    /// Stops at the first failure; the error carries the failing key and the
    /// keys before it stay deleted.
    async fn delete_many(&self, keys: &[StorageKey]) -> Result<()> {
        for key in keys {
            self.delete(key).await?;
            debug!(bucket = %self.bucket(), key = %key, "Deleted object");
        }
        Ok(())
    }
}
