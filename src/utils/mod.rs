//! Utility functions and helpers.

pub mod http;

use url::Url;

use crate::error::{AppError, Result};

/// Parse `url_str` and require an absolute `http` or `https` URL.
pub fn validate_http_url(url_str: &str) -> Result<Url> {
    match Url::parse(url_str) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(url),
        Ok(_) => Err(AppError::config(format!(
            "Invalid monitor.url '{url_str}': must start with http:// or https://"
        ))),
        Err(e) => Err(AppError::config(format!(
            "Invalid monitor.url '{url_str}': {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_http_url() {
        assert!(validate_http_url("https://example.com/path").is_ok());
        assert!(validate_http_url("http://127.0.0.1:8080/").is_ok());
        assert!(validate_http_url("ftp://example.com/").is_err());
        assert!(validate_http_url("example.com/page").is_err());
        assert!(validate_http_url("").is_err());
    }
}
