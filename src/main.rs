//! Redis Basic smoke test
//!
//! Exercises the value cache, call replay and page cache against the configured store.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use redis_basic::{
    call_count, replay, spawn_cleanup_task, Cache, Config, HttpFetcher, KeyValueStore,
    MemoryStore, PageCache, RedisStore, StoredValue,
};

/// Entry point of the smoke test.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect to Redis, or start an in-memory store when `REDIS_URL` is empty
/// 4. Store and read back one value of each scalar kind, then replay the calls
/// 5. Fetch the smoke URL twice and print its access count
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redis_basic=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: redis_url={:?}, page_ttl={}s, smoke_url={}",
        config.redis_url, config.page_ttl, config.smoke_url
    );

    let mut cleanup_handle = None;
    let store: Arc<dyn KeyValueStore> = match &config.redis_url {
        Some(url) => Arc::new(RedisStore::connect(url).await?),
        None => {
            let memory = Arc::new(MemoryStore::new());
            cleanup_handle = Some(spawn_cleanup_task(memory.clone(), config.cleanup_interval));
            info!("Using in-memory store");
            memory
        }
    };

    let cache = Cache::new(store.clone()).await?;

    let values: [StoredValue; 4] = [
        "foo".into(),
        b"bar".to_vec().into(),
        42.into(),
        3.5.into(),
    ];
    for value in values {
        let key = cache.store(value).await?;
        let raw = cache.get(&key).await?.unwrap_or_default();
        println!("{} -> {}", key, String::from_utf8_lossy(&raw));
    }

    let op = cache.store_operation();
    println!("store calls: {}", call_count(op).await?);
    println!("{}", replay(op).await?);

    let pages = PageCache::new(store, HttpFetcher::new()).with_ttl(config.page_ttl());
    let url = config.smoke_url.as_str();
    println!("{}", pages.get_page(url).await?);
    println!("{}", pages.get_page(url).await?);
    println!("{}", pages.access_count(url).await?);

    if let Some(handle) = cleanup_handle {
        handle.abort();
    }

    Ok(())
}
