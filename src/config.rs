//! Configuration Module
//!
//! Handles loading the store location and page cache settings from environment variables.

use std::env;
use std::time::Duration;

/// Default Redis connection URL
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/";

/// Default page cache TTL in seconds
pub const DEFAULT_PAGE_TTL: u64 = 10;

/// Default memory store cleanup interval in seconds
pub const DEFAULT_CLEANUP_INTERVAL: u64 = 1;

/// Default URL fetched by the smoke-test binary
pub const DEFAULT_SMOKE_URL: &str = "http://slowwly.robertomurray.co.uk";

/// Runtime configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis connection URL, `None` selects the in-memory store
    pub redis_url: Option<String>,
    /// Expiry in seconds for cached pages
    pub page_ttl: u64,
    /// URL fetched by the smoke-test binary
    pub smoke_url: String,
    /// Memory store cleanup interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_URL` - Redis URL (default: redis://127.0.0.1:6379/, empty = in-memory store)
    /// - `PAGE_TTL` - Page cache TTL in seconds (default: 10)
    /// - `SMOKE_URL` - Page fetched by the smoke test (default: http://slowwly.robertomurray.co.uk)
    /// - `CLEANUP_INTERVAL` - Memory store cleanup frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let redis_url = match env::var("REDIS_URL") {
            Ok(url) if url.trim().is_empty() => None,
            Ok(url) => Some(url),
            Err(_) => Some(DEFAULT_REDIS_URL.to_string()),
        };

        Self {
            redis_url,
            page_ttl: env::var("PAGE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PAGE_TTL),
            smoke_url: env::var("SMOKE_URL").unwrap_or_else(|_| DEFAULT_SMOKE_URL.to_string()),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CLEANUP_INTERVAL),
        }
    }

    /// Page cache TTL as a Duration.
    pub fn page_ttl(&self) -> Duration {
        Duration::from_secs(self.page_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: Some(DEFAULT_REDIS_URL.to_string()),
            page_ttl: DEFAULT_PAGE_TTL,
            smoke_url: DEFAULT_SMOKE_URL.to_string(),
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }
}
