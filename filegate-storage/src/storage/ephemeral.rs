//! In-memory ephemeral storage backend

use super::traits::{ObjectStore, DEFAULT_PAGE_SIZE};
use super::url::{public_url, UrlStrategy};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use dashmap::DashMap;
use filegate_auth::{presign_get_object, Credentials};
use filegate_core::{GatewayError, Result, StorageKey};
use tracing::{debug, warn};

/// Ephemeral (in-memory) bucket.
///
/// Listing mirrors S3: keys come back in lexicographic order and, unless
/// `list_all_pages` is set, only the first page is returned.
pub struct EphemeralStore {
    bucket: String,
    region: String,
    objects: DashMap<String, Bytes>,
    urls: UrlStrategy,
    credentials: Option<Credentials>,
    page_size: usize,
    list_all_pages: bool,
}

impl EphemeralStore {
    /// Empty bucket handing out public URLs
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: "us-east-1".to_string(),
            objects: DashMap::new(),
            urls: UrlStrategy::Public,
            credentials: None,
            page_size: DEFAULT_PAGE_SIZE,
            list_all_pages: false,
        }
    }

    /// Sign returned URLs with `credentials` instead of handing out public ones
    pub fn with_presigned_urls(
        mut self,
        credentials: Credentials,
        region: impl Into<String>,
        expires_in: std::time::Duration,
    ) -> Self {
        self.urls = UrlStrategy::presigned(expires_in);
        self.credentials = Some(credentials);
        self.region = region.into();
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_list_all_pages(mut self, list_all_pages: bool) -> Self {
        self.list_all_pages = list_all_pages;
        self
    }

    /// Contents of an object, if present
    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.objects.get(key).map(|obj| obj.value().clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// All keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.iter().map(|r| r.key().clone()).collect();
        keys.sort();
        keys
    }

    fn object_url(&self, key: &StorageKey) -> Result<String> {
        match self.urls {
            UrlStrategy::Public => Ok(public_url(&self.bucket, key.as_str())),
            UrlStrategy::Presigned { expires_in } => {
                let credentials = self.credentials.as_ref().ok_or_else(|| {
                    GatewayError::upload(key.as_str(), "no credentials configured for URL signing")
                })?;
                presign_get_object(
                    credentials,
                    &self.region,
                    &self.bucket,
                    key.as_str(),
                    expires_in,
                    Utc::now(),
                )
                .map_err(|e| GatewayError::upload(key.as_str(), e))
            }
        }
    }
}

#[async_trait]
impl ObjectStore for EphemeralStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put(&self, key: &StorageKey, body: Bytes) -> Result<String> {
        let size = body.len();
        self.objects.insert(key.as_str().to_string(), body);
        debug!(bucket = %self.bucket, key = %key, size, "Stored object");

        self.object_url(key)
    }

    async fn delete(&self, key: &StorageKey) -> Result<()> {
        let existed = self.objects.remove(key.as_str()).is_some();
        debug!(bucket = %self.bucket, key = %key, existed, "Deleted object");
        Ok(())
    }

    async fn list_by_prefix(&self, prefix: &StorageKey) -> Result<Vec<StorageKey>> {
        let mut keys: Vec<StorageKey> = self
            .objects
            .iter()
            .filter(|entry| entry.key().starts_with(prefix.as_str()))
            .map(|entry| StorageKey::new(entry.key().clone()))
            .collect();

        // Sort by key
        keys.sort();

        if !self.list_all_pages && keys.len() > self.page_size {
            warn!(
                bucket = %self.bucket,
                prefix = %prefix,
                matched = keys.len(),
                returned = self.page_size,
                "Listing truncated to one page"
            );
            keys.truncate(self.page_size);
        }

        Ok(keys)
    }
}
