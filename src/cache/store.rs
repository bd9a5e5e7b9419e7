//! Cache Store Module
//!
//! Random-key value storage on top of a KeyValueStore, with call tracking on `store`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cache::{decode_float, decode_int, decode_str, StoredValue};
use crate::error::Result;
use crate::store::KeyValueStore;
use crate::tracking::{CountingMiddleware, HistoryMiddleware, Operation};

/// Qualified name of the tracked store operation
pub const STORE_OPERATION: &str = "Cache::store";

// == Store Operation ==
/// Writes a value under a fresh UUID v4 key and returns the key.
#[derive(Clone)]
pub struct StoreOperation {
    store: Arc<dyn KeyValueStore>,
}

#[async_trait]
impl Operation for StoreOperation {
    type Input = (StoredValue,);
    type Output = String;

    fn qualified_name(&self) -> &str {
        STORE_OPERATION
    }

    fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    async fn invoke(&self, input: Self::Input) -> Result<Self::Output> {
        let (data,) = input;
        let key = Uuid::new_v4().to_string();
        self.store.set(&key, &data.to_bytes()).await?;
        Ok(key)
    }
}

/// `store` as seen by callers: counted, then recorded, then written.
pub type TrackedStore = CountingMiddleware<HistoryMiddleware<StoreOperation>>;

// == Cache ==
/// Stores scalar values under random keys and reads them back.
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn KeyValueStore>,
    store_op: TrackedStore,
}

impl Cache {
    // == Constructor ==
    /// Creates a cache over `store`.
    ///
    /// This issues FLUSHDB: every key in the store's current database is
    /// removed, including keys written by other clients sharing it.
    pub async fn new(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        warn!("Flushing the store database for a new cache");
        store.flushdb().await?;

        let store_op = CountingMiddleware::new(HistoryMiddleware::new(StoreOperation {
            store: store.clone(),
        }));
        info!("Cache initialized");

        Ok(Self { store, store_op })
    }

    // == Store ==
    /// Writes `data` under a new random key and returns the key.
    pub async fn store(&self, data: impl Into<StoredValue>) -> Result<String> {
        self.store_op.invoke((data.into(),)).await
    }

    /// The tracked `store` operation, for `replay` and `call_count`.
    pub fn store_operation(&self) -> &TrackedStore {
        &self.store_op
    }

    // == Get ==
    /// Reads the raw bytes under `key`, `None` if absent.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self.store.get(key).await?;
        debug!(key, hit = value.is_some(), "Cache lookup");
        Ok(value)
    }

    /// Reads `key` and applies `decoder` to the raw bytes when present.
    ///
    /// Decoder errors are returned to the caller.
    pub async fn get_with<T, F>(&self, key: &str, decoder: F) -> Result<Option<T>>
    where
        F: FnOnce(Vec<u8>) -> Result<T>,
    {
        self.get(key).await?.map(decoder).transpose()
    }

    /// Reads `key` as UTF-8 text.
    pub async fn get_str(&self, key: &str) -> Result<Option<String>> {
        self.get_with(key, decode_str).await
    }

    /// Reads `key` as an integer.
    pub async fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_with(key, decode_int).await
    }

    /// Reads `key` as a float.
    pub async fn get_float(&self, key: &str) -> Result<Option<f64>> {
        self.get_with(key, decode_float).await
    }
}
