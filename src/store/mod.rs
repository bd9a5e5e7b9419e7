//! Store Module
//!
//! The key-value store collaborator: the command set every component relies on,
//! backed either by a Redis server or by an in-process map.

mod entry;
mod memory;
mod redis_store;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

pub use entry::{EntryData, StoreEntry};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;

/// TTL applied in place of a zero TTL; SETEX rejects an expiry of 0.
pub const MIN_TTL: Duration = Duration::from_secs(1);

// == Key Value Store ==
/// The store commands used by the cache wrappers.
///
/// Each command is atomic on its own; nothing here groups commands into
/// transactions.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// SET: unconditional write without expiry.
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// SETEX: write with expiry. A zero `ttl` is raised to `MIN_TTL`.
    async fn set_ex(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()>;

    /// GET: raw bytes, or `None` when the key is absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// INCR: increments the counter, starting from 0 when absent. Returns the new value.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// RPUSH: appends to the list, creating it when absent. Returns the new length.
    async fn rpush(&self, key: &str, value: &[u8]) -> Result<usize>;

    /// LRANGE: elements between `start` and `stop` inclusive, negative indices count from the end.
    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>>;

    /// FLUSHDB: removes every key of the current database.
    async fn flushdb(&self) -> Result<()>;
}
