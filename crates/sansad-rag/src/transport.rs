//! Document download transport with timeout and bounded retries
//!
//! Remote ingestion fetches PDF bytes over HTTP. Transient failures (429,
//! server errors, connect errors) are retried with exponential backoff;
//! client errors fail immediately. Exhausting the retry budget surfaces a
//! terminal transport error, never a silent empty result.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::TransportConfig;
use crate::error::{Error, Result};

/// Trait for fetching remote document bytes
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch the bytes behind a URL
    async fn fetch(&self, url: &str) -> Result<Bytes>;
}

/// HTTP fetcher backed by reqwest
pub struct HttpFetcher {
    client: reqwest::Client,
    max_retries: u32,
    backoff_base: Duration,
}

impl HttpFetcher {
    /// Create a fetcher from transport configuration
    pub fn new(config: &TransportConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            backoff_base: Duration::from_millis(config.backoff_base_ms),
        })
    }
}

fn is_retryable_status(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response
                            .bytes()
                            .await
                            .map_err(|e| Error::Transport(format!("Download failed: {}", e)));
                    }
                    let error =
                        Error::Transport(format!("Download failed: HTTP {} for {}", status, url));
                    if !is_retryable_status(status) {
                        return Err(error);
                    }
                    last_error = Some(error);
                }
                Err(e) => {
                    // Connect and timeout errors are worth retrying.
                    last_error = Some(Error::Transport(format!("Download failed: {}", e)));
                }
            }

            if attempt < self.max_retries {
                let delay = self.backoff_base * 2u32.pow(attempt);
                tracing::warn!(
                    "Download of {} failed (attempt {}/{}), retrying in {:?}",
                    url,
                    attempt + 1,
                    self.max_retries + 1,
                    delay
                );
                sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| Error::Transport(format!("Download failed for {}", url))))
    }
}
