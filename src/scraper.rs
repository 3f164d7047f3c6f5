//! Page fetching.
//!
//! Uses reqwest for fetching. URL syntax and HTTP status are checked here so
//! that extraction only ever sees a successfully fetched page.

use crate::config::FetchConfig;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),
    #[error("{url} responded with HTTP {status}")]
    HttpStatus { url: String, status: StatusCode },
}

/// Check that a URL is absolute http(s)
pub fn validate_url(url: &str) -> Result<Url, ScraperError> {
    let invalid = |reason: String| ScraperError::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    let parsed = Url::parse(url.trim()).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}

/// HTTP client for fetching raw HTML
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Create a configured HTTP client for scraping
    pub fn new(config: &FetchConfig) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// Fetch the HTML of a page. Non-2xx responses are errors.
    pub async fn fetch(&self, url: &str) -> Result<String, ScraperError> {
        let url = validate_url(url)?;
        debug!(%url, "fetching page");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let html = response.text().await?;
        info!(%url, bytes = html.len(), "fetched page");
        Ok(html)
    }
}
