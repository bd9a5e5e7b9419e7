//! Memory Store Module
//!
//! In-process store implementing the Redis command semantics over a HashMap,
//! with passive TTL expiration.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::store::{EntryData, KeyValueStore, StoreEntry, MIN_TTL};

// == Memory Store ==
/// HashMap-backed store with TTL support.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Key-value storage
    entries: RwLock<HashMap<String, StoreEntry>>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty MemoryStore.
    pub fn new() -> Self {
        Self::default()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    // == Length ==
    /// Returns the number of stored keys, expired ones included until purged.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no keys.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Returns the live entry for `key`, dropping it first if it has expired.
fn live_entry<'a>(
    entries: &'a mut HashMap<String, StoreEntry>,
    key: &str,
) -> Option<&'a mut StoreEntry> {
    if entries.get(key).is_some_and(StoreEntry::is_expired) {
        entries.remove(key);
        debug!(key, "Dropped expired key");
    }
    entries.get_mut(key)
}

fn wrong_type(key: &str) -> CacheError {
    CacheError::WrongType(format!(
        "Operation against key '{}' holding the wrong kind of value",
        key
    ))
}

/// Resolves Redis-style inclusive range bounds against a list length.
fn range_bounds(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if start > stop || start >= len {
        None
    } else {
        Some((start as usize, stop as usize))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let entry = StoreEntry::new(EntryData::Bytes(value.to_vec()), None);
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn set_ex(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let ttl = if ttl.is_zero() { MIN_TTL } else { ttl };
        let entry = StoreEntry::new(EntryData::Bytes(value.to_vec()), Some(ttl));
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key) {
            None => Ok(None),
            Some(StoreEntry {
                data: EntryData::Bytes(value),
                ..
            }) => Ok(Some(value.clone())),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key) {
            // TTL of an existing counter survives the increment
            Some(entry) => {
                let EntryData::Bytes(value) = &mut entry.data else {
                    return Err(wrong_type(key));
                };
                let current: i64 = std::str::from_utf8(value)
                    .ok()
                    .and_then(|text| text.parse().ok())
                    .ok_or_else(|| {
                        CacheError::WrongType(format!("Value at '{}' is not an integer", key))
                    })?;
                let next = current
                    .checked_add(1)
                    .ok_or_else(|| CacheError::WrongType(format!("Increment of '{}' overflows", key)))?;
                *value = next.to_string().into_bytes();
                Ok(next)
            }
            None => {
                let entry = StoreEntry::new(EntryData::Bytes(b"1".to_vec()), None);
                entries.insert(key.to_string(), entry);
                Ok(1)
            }
        }
    }

    async fn rpush(&self, key: &str, value: &[u8]) -> Result<usize> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key) {
            Some(entry) => {
                let EntryData::List(items) = &mut entry.data else {
                    return Err(wrong_type(key));
                };
                items.push(value.to_vec());
                Ok(items.len())
            }
            None => {
                let entry = StoreEntry::new(EntryData::List(vec![value.to_vec()]), None);
                entries.insert(key.to_string(), entry);
                Ok(1)
            }
        }
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key) {
            None => Ok(Vec::new()),
            Some(StoreEntry {
                data: EntryData::List(items),
                ..
            }) => Ok(match range_bounds(items.len(), start, stop) {
                Some((from, to)) => items[from..=to].to_vec(),
                None => Vec::new(),
            }),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn flushdb(&self) -> Result<()> {
        let mut entries = self.entries.write().await;
        let removed = entries.len();
        entries.clear();
        debug!(removed, "Flushed memory store");
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_store_new() {
        let store = MemoryStore::new();
        assert_eq!(store.len().await, 0);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_store_set_and_get() {
        let store = MemoryStore::new();

        store.set("key1", b"value1").await.unwrap();

        assert_eq!(store.get("key1").await.unwrap(), Some(b"value1".to_vec()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_store_get_nonexistent() {
        let store = MemoryStore::new();
        assert_eq!(store.get("nonexistent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_overwrite_clears_ttl() {
        let store = MemoryStore::new();

        store
            .set_ex("key1", b"value1", Duration::from_millis(100))
            .await
            .unwrap();
        store.set("key1", b"value2").await.unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(store.get("key1").await.unwrap(), Some(b"value2".to_vec()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_store_ttl_expiration() {
        let store = MemoryStore::new();

        store
            .set_ex("key1", b"value1", Duration::from_millis(100))
            .await
            .unwrap();
        assert!(store.get("key1").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(store.get("key1").await.unwrap(), None);
        assert!(store.is_empty().await, "Expired key should be dropped on access");
    }

    #[tokio::test]
    async fn test_zero_ttl_uses_min_ttl() {
        let store = MemoryStore::new();

        store.set_ex("key1", b"value1", Duration::ZERO).await.unwrap();

        assert_eq!(store.get("key1").await.unwrap(), Some(b"value1".to_vec()));
    }

    #[tokio::test]
    async fn test_huge_ttl_does_not_expire() {
        let store = MemoryStore::new();

        store
            .set_ex("key1", b"value1", Duration::from_secs(u64::MAX))
            .await
            .unwrap();

        assert_eq!(store.get("key1").await.unwrap(), Some(b"value1".to_vec()));
        assert_eq!(store.purge_expired().await, 0);
    }

    #[tokio::test]
    async fn test_incr_initializes_and_counts() {
        let store = MemoryStore::new();

        assert_eq!(store.incr("counter").await.unwrap(), 1);
        assert_eq!(store.incr("counter").await.unwrap(), 2);
        assert_eq!(store.incr("counter").await.unwrap(), 3);
        assert_eq!(store.get("counter").await.unwrap(), Some(b"3".to_vec()));
    }

    #[tokio::test]
    async fn test_incr_existing_numeric_value() {
        let store = MemoryStore::new();

        store.set("counter", b"41").await.unwrap();
        assert_eq!(store.incr("counter").await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_incr_non_integer_value() {
        let store = MemoryStore::new();

        store.set("text", b"hello").await.unwrap();
        let result = store.incr("text").await;
        assert!(matches!(result, Err(CacheError::WrongType(_))));
    }

    #[tokio::test]
    async fn test_rpush_and_lrange() {
        let store = MemoryStore::new();

        assert_eq!(store.rpush("list", b"a").await.unwrap(), 1);
        assert_eq!(store.rpush("list", b"b").await.unwrap(), 2);
        assert_eq!(store.rpush("list", b"c").await.unwrap(), 3);

        let all = store.lrange("list", 0, -1).await.unwrap();
        assert_eq!(all, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);

        let tail = store.lrange("list", -2, -1).await.unwrap();
        assert_eq!(tail, vec![b"b".to_vec(), b"c".to_vec()]);

        let clamped = store.lrange("list", 1, 100).await.unwrap();
        assert_eq!(clamped, vec![b"b".to_vec(), b"c".to_vec()]);

        assert!(store.lrange("list", 5, 10).await.unwrap().is_empty());
        assert!(store.lrange("list", 2, 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lrange_missing_key() {
        let store = MemoryStore::new();
        assert!(store.lrange("missing", 0, -1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_type_commands() {
        let store = MemoryStore::new();

        store.rpush("list", b"a").await.unwrap();
        store.set("plain", b"value").await.unwrap();

        assert!(matches!(store.get("list").await, Err(CacheError::WrongType(_))));
        assert!(matches!(store.incr("list").await, Err(CacheError::WrongType(_))));
        assert!(matches!(
            store.rpush("plain", b"b").await,
            Err(CacheError::WrongType(_))
        ));
        assert!(matches!(
            store.lrange("plain", 0, -1).await,
            Err(CacheError::WrongType(_))
        ));
    }

    #[tokio::test]
    async fn test_flushdb() {
        let store = MemoryStore::new();

        store.set("key1", b"value1").await.unwrap();
        store.rpush("list", b"a").await.unwrap();
        store.incr("counter").await.unwrap();

        store.flushdb().await.unwrap();

        assert!(store.is_empty().await);
        assert_eq!(store.get("key1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_cleanup_expired() {
        let store = MemoryStore::new();

        store
            .set_ex("key1", b"value1", Duration::from_millis(100))
            .await
            .unwrap();
        store
            .set_ex("key2", b"value2", Duration::from_secs(10))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;

        let removed = store.purge_expired().await;
        assert_eq!(removed, 1);
        assert_eq!(store.len().await, 1);
        assert!(store.get("key2").await.unwrap().is_some());
    }

    #[test]
    fn test_range_bounds() {
        assert_eq!(range_bounds(3, 0, -1), Some((0, 2)));
        assert_eq!(range_bounds(3, -10, 0), Some((0, 0)));
        assert_eq!(range_bounds(3, 3, 5), None);
        assert_eq!(range_bounds(0, 0, -1), None);
    }
}
