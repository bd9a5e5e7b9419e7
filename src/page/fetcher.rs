//! Page Fetcher Module
//!
//! The HTTP collaborator of the page cache.

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;

// == Page Fetcher ==
/// Fetches the body of a URL.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

// == HTTP Fetcher ==
/// `PageFetcher` issuing a plain GET with reqwest.
///
/// The body is returned whatever the response status; only transport failures are errors.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        debug!(url, status = %response.status(), "Fetched page");
        Ok(response.text().await?)
    }
}
