//! Object store double that records calls and injects failures

use async_trait::async_trait;
use bytes::Bytes;
use filegate_core::{GatewayError, Result, StorageKey};
use filegate_storage::{EphemeralStore, ObjectStore};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::time::Duration;

/// A call that reached the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Put(String),
    Delete(String),
    List(String),
}

#[derive(Default)]
struct Faults {
    failing_deletes: HashSet<String>,
    fail_puts: bool,
    fail_listing: bool,
    put_delay: Option<Duration>,
}

/// Wraps an [`EphemeralStore`], logging every call in arrival order.
pub struct RecordingStore {
    inner: EphemeralStore,
    calls: Mutex<Vec<StoreCall>>,
    faults: Mutex<Faults>,
}

impl RecordingStore {
    pub fn new(bucket: &str) -> Self {
        Self::wrap(EphemeralStore::new(bucket))
    }

    pub fn wrap(inner: EphemeralStore) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
            faults: Mutex::new(Faults::default()),
        }
    }

    /// Make `delete` of this key fail
    pub fn fail_delete_of(&self, key: &str) {
        self.faults.lock().failing_deletes.insert(key.to_string());
    }

    pub fn fail_puts(&self) {
        self.faults.lock().fail_puts = true;
    }

    pub fn fail_listing(&self) {
        self.faults.lock().fail_listing = true;
    }

    /// Hold every `put` for `delay` before storing
    pub fn delay_puts(&self, delay: Duration) {
        self.faults.lock().put_delay = Some(delay);
    }

    /// Seed an object without recording a call
    pub async fn seed(&self, key: &str, body: &str) -> Result<()> {
        self.inner
            .put(&StorageKey::from(key), Bytes::from(body.to_string()))
            .await
            .map(|_| ())
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    pub fn inner(&self) -> &EphemeralStore {
        &self.inner
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl ObjectStore for RecordingStore {
    fn bucket(&self) -> &str {
        self.inner.bucket()
    }

    async fn put(&self, key: &StorageKey, body: Bytes) -> Result<String> {
        self.record(StoreCall::Put(key.to_string()));

        let (fail, delay) = {
            let faults = self.faults.lock();
            (faults.fail_puts, faults.put_delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if fail {
            return Err(GatewayError::upload(key.as_str(), "injected put failure"));
        }
        self.inner.put(key, body).await
    }

    async fn delete(&self, key: &StorageKey) -> Result<()> {
        self.record(StoreCall::Delete(key.to_string()));

        if self.faults.lock().failing_deletes.contains(key.as_str()) {
            return Err(GatewayError::delete(key.as_str(), "injected delete failure"));
        }
        self.inner.delete(key).await
    }

    async fn list_by_prefix(&self, prefix: &StorageKey) -> Result<Vec<StorageKey>> {
        self.record(StoreCall::List(prefix.to_string()));

        if self.faults.lock().fail_listing {
            return Err(GatewayError::list(prefix.as_str(), "injected listing failure"));
        }
        self.inner.list_by_prefix(prefix).await
    }
}
