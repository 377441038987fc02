//! HTTP client for catalogue fetching
//!
//! A blocking client configured for polite scraping: per-request timeout,
//! identifying user agent, gzip. Fetching is strictly sequential; the
//! politeness delay between pages lives in the crawler, not here.

use reqwest::blocking::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::infrastructure::config::CrawlingConfig;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {source}")]
    Build { source: reqwest::Error },

    #[error("request for {url} failed with status {status}")]
    HttpStatus { status: u16, url: String },

    #[error("transport error fetching {url}: {source}")]
    Transport { url: String, source: reqwest::Error },
}

/// Seam between the pagination driver and the network.
///
/// The production implementation is [`HttpClient`]; tests substitute an
/// in-memory fetcher so no crawl test touches the network.
pub trait PageFetcher {
    /// Fetch one page and return its body on a successful status.
    fn fetch_page(&self, url: &str) -> Result<String, FetchError>;
}

/// Blocking HTTP client wrapping `reqwest`.
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(config: &CrawlingConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(config.user_agent.clone())
            .gzip(true)
            .build()
            .map_err(|source| FetchError::Build { source })?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpClient {
    fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        debug!(%url, "fetching page");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })
    }
}
