//! Bounded-time article download.
//!
//! One GET per URL, no retries. The whole exchange (connect, headers and
//! body) has to finish within the configured budget, otherwise the fetch is
//! reported as a timeout rather than a fetch failure.

use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

/// Why an article could not be downloaded.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("server answered with status {0}")]
    Status(StatusCode),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("fetch did not finish within {0:?}")]
    Timeout(Duration),
}

/// Downloads article pages with a per-request time budget.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    http: Client,
    timeout: Duration,
}

impl Fetcher {
    /// Create a fetcher around an existing client.
    ///
    /// # Arguments
    ///
    /// * `http` - Shared HTTP client
    /// * `timeout` - Budget for one complete fetch
    pub fn new(http: Client, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    /// Download `url` and return the body as text.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Timeout`] if the budget runs out first
    /// - [`FetchError::Status`] on a non-success response
    /// - [`FetchError::InvalidUrl`] / [`FetchError::Transport`] otherwise
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let url = Url::parse(url)?;
        let t0 = Instant::now();

        let res = match tokio::time::timeout(self.timeout, self.download(url)).await {
            Ok(res) => res,
            Err(_) => Err(FetchError::Timeout(self.timeout)),
        };

        let elapsed_ms = t0.elapsed().as_millis();
        match &res {
            Ok(body) => debug!(elapsed_ms, bytes = body.len(), "Fetched page"),
            Err(e) => warn!(elapsed_ms, error = %e, "Fetch failed"),
        }
        res
    }

    async fn download(&self, url: Url) -> Result<String, FetchError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        Ok(response.text().await?)
    }
}
