// src/services/fetcher.rs

//! Page fetcher service.
//!
//! Retrieves the raw markup of the monitored page. Every transport failure is
//! classified into a [`FetchError`] and returned; nothing is retried here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{FetchError, Result};
use crate::models::MonitorConfig;
use crate::utils::http;

/// Source of raw page markup.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the document at `url`.
    async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError>;
}

/// Fetches pages over HTTP(S) with a browser-like request profile.
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a fetcher from the monitor configuration.
    pub fn new(config: &MonitorConfig) -> Result<Self> {
        Self::with_timeout(&config.user_agent, Duration::from_secs(config.timeout_secs))
    }

    /// Create a fetcher with an explicit user agent and timeout.
    pub fn with_timeout(user_agent: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http::create_client_with_timeout(user_agent, timeout)?,
            timeout,
        })
    }

    fn classify(&self, url: &str, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else if error.is_connect() {
            FetchError::ConnectionFailed(url.to_string())
        } else {
            FetchError::Other(error.to_string())
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError> {
        log::debug!("Fetching {} (timeout {:?})", url, self.timeout);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let text = response.text().await.map_err(|e| self.classify(url, e))?;
        log::debug!("Fetched {} bytes from {}", text.len(), url);
        Ok(text)
    }
}
