//! Redis Basic - value caching, call tracking and page caching over Redis
//!
//! Stores scalars under random keys, counts and records calls to the store
//! operation for replay, and caches fetched web pages with a TTL.

pub mod cache;
pub mod config;
pub mod error;
pub mod page;
pub mod store;
pub mod tasks;
pub mod tracking;

pub use cache::{Cache, StoredValue};
pub use config::Config;
pub use error::{CacheError, Result};
pub use page::{HttpFetcher, PageCache, PageFetcher};
pub use store::{KeyValueStore, MemoryStore, RedisStore};
pub use tasks::spawn_cleanup_task;
pub use tracking::{call_count, replay, CallReplay, Operation};
