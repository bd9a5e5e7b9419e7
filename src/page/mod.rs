//! Page Module
//!
//! Web page caching with a TTL and per-URL access counters.

mod fetcher;
mod page_cache;

pub use fetcher::{HttpFetcher, PageFetcher};
pub use page_cache::{count_key, PageCache};
