//! Redis Store Module
//!
//! KeyValueStore backed by a Redis server through a reconnecting ConnectionManager.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, ErrorKind, RedisError};
use tracing::{debug, info};

use crate::error::{CacheError, Result};
use crate::store::{KeyValueStore, MIN_TTL};

// == Redis Store ==
/// Store handle talking to a Redis server.
///
/// Cloning is cheap: clones share the underlying multiplexed connection.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    // == Constructor ==
    /// Connects to the Redis server at `url`.
    ///
    /// # Errors
    /// `CacheError::Store` when the URL is invalid or the server is unreachable.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        info!("Connected to Redis at {}", url);
        Ok(Self { conn })
    }
}

/// SETEX only accepts whole seconds; round up so entries never expire early.
fn ttl_seconds(ttl: Duration) -> u64 {
    let secs = ttl
        .as_secs()
        .saturating_add(u64::from(ttl.subsec_nanos() > 0));
    secs.max(MIN_TTL.as_secs())
}

/// Maps a server WRONGTYPE reply to `CacheError::WrongType`, anything else to `Store`.
fn store_error(err: RedisError) -> CacheError {
    if err.kind() == ErrorKind::TypeError {
        CacheError::WrongType(err.to_string())
    } else {
        CacheError::Store(err)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key, value).await.map_err(store_error)?;
        debug!(key, "SET");
        Ok(())
    }

    async fn set_ex(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        let seconds = ttl_seconds(ttl);
        let _: () = conn.set_ex(key, value, seconds).await.map_err(store_error)?;
        debug!(key, seconds, "SETEX");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await.map_err(store_error)?;
        debug!(key, hit = value.is_some(), "GET");
        Ok(value)
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut conn = self.conn.clone();
        let value: i64 = conn.incr(key, 1).await.map_err(store_error)?;
        debug!(key, value, "INCR");
        Ok(value)
    }

    async fn rpush(&self, key: &str, value: &[u8]) -> Result<usize> {
        let mut conn = self.conn.clone();
        let len: usize = conn.rpush(key, value).await.map_err(store_error)?;
        debug!(key, len, "RPUSH");
        Ok(len)
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let items: Vec<Vec<u8>> = conn.lrange(key, start, stop).await.map_err(store_error)?;
        debug!(key, count = items.len(), "LRANGE");
        Ok(items)
    }

    async fn flushdb(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("FLUSHDB")
            .query_async(&mut conn)
            .await
            .map_err(store_error)?;
        debug!("FLUSHDB");
        Ok(())
    }
}
