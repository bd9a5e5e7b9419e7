//! Page Cache Module
//!
//! Caches fetched page bodies with a TTL and counts accesses per URL.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::{decode_int, decode_str};
use crate::config::DEFAULT_PAGE_TTL;
use crate::error::Result;
use crate::page::PageFetcher;
use crate::store::KeyValueStore;

/// Key of the access counter for `url`.
pub fn count_key(url: &str) -> String {
    format!("count:{}", url)
}

// == Page Cache ==
/// Serves page bodies from the store while fresh, fetching them otherwise.
///
/// Per URL: uncached -> fetched and cached for `ttl` -> uncached again once the
/// store expires the body. The access counter never expires.
pub struct PageCache<F> {
    store: Arc<dyn KeyValueStore>,
    fetcher: F,
    ttl: Duration,
}

impl<F: PageFetcher> PageCache<F> {
    // == Constructor ==
    /// Creates a page cache with the default 10 second TTL.
    pub fn new(store: Arc<dyn KeyValueStore>, fetcher: F) -> Self {
        Self {
            store,
            fetcher,
            ttl: Duration::from_secs(DEFAULT_PAGE_TTL),
        }
    }

    /// Overrides how long fetched bodies stay cached.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    // == Get Page ==
    /// Returns the body of `url`, from the store when cached.
    ///
    /// Every call counts as an access, hit or miss. Concurrent misses for the
    /// same URL may each fetch and write; both writes carry the same TTL.
    pub async fn get_page(&self, url: &str) -> Result<String> {
        let accesses = self.store.incr(&count_key(url)).await?;

        if let Some(cached) = self.store.get(url).await? {
            debug!(url, accesses, "Page cache hit");
            return decode_str(cached);
        }

        debug!(url, accesses, "Page cache miss");
        let body = self.fetcher.fetch(url).await?;
        self.store.set_ex(url, body.as_bytes(), self.ttl).await?;
        Ok(body)
    }

    // == Access Count ==
    /// Number of `get_page` calls for `url`, 0 if never requested.
    pub async fn access_count(&self, url: &str) -> Result<i64> {
        match self.store.get(&count_key(url)).await? {
            Some(raw) => decode_int(raw),
            None => Ok(0),
        }
    }
}
