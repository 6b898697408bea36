// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};

use crate::error::Result;

/// Accept header sent with every page request.
pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Accept-Language header sent with every page request.
pub const ACCEPT_LANGUAGE_EN: &str = "en-US,en;q=0.5";

/// Headers some servers require before they serve a real page.
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_EN));
    headers
}

/// Create a client with an explicit timeout.
pub fn create_client_with_timeout(user_agent: &str, timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(user_agent)
        .default_headers(browser_headers())
        .timeout(timeout)
        .build()?;
    Ok(client)
}
