//! Upload and delete services

use crate::storage::ObjectStore;
use bytes::Bytes;
use filegate_core::{build_folder_prefix, build_upload_key, Result, StorageKey};
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub url: String,
    pub key: StorageKey,
}

/// Stores uploaded files under the per-user, per-folder key layout
#[derive(Clone)]
pub struct UploadService {
    store: Arc<dyn ObjectStore>,
}

impl UploadService {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    pub async fn upload(
        &self,
        user_id: &str,
        folder_name: &str,
        filename: &str,
        body: Bytes,
    ) -> Result<UploadResult> {
        let key = build_upload_key(user_id, folder_name, filename);
        info!(bucket = %self.store.bucket(), key = %key, size = body.len(), "Uploading file");

        let url = self.store.put(&key, body).await?;

        info!(bucket = %self.store.bucket(), key = %key, "Uploaded file");
        Ok(UploadResult { url, key })
    }

    /// Get reference to storage backend
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }
}

/// Removes single objects or whole folders
#[derive(Clone)]
pub struct DeleteService {
    store: Arc<dyn ObjectStore>,
}

impl DeleteService {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    pub async fn delete_one(&self, key: &StorageKey) -> Result<()> {
        info!(bucket = %self.store.bucket(), key = %key, "Deleting file");
        self.store.delete(key).await?;
        info!(bucket = %self.store.bucket(), key = %key, "Deleted file");
        Ok(())
    }

    /// Delete every object whose key starts with `folder_name`.
    ///
    /// One listing call, then one delete per listed key in listing order. The
    /// first failure is returned as is; objects deleted before it stay deleted.
    /// Returns the number of objects removed.
    pub async fn delete_folder(&self, folder_name: &str) -> Result<usize> {
        let prefix = build_folder_prefix(folder_name);
        info!(bucket = %self.store.bucket(), prefix = %prefix, "Deleting folder");

        let keys = self.store.list_by_prefix(&prefix).await?;
        debug!(prefix = %prefix, count = keys.len(), "Listed folder");

        self.store.delete_many(&keys).await?;

        info!(bucket = %self.store.bucket(), prefix = %prefix, deleted = keys.len(), "Deleted folder");
        Ok(keys.len())
    }
}
