// src/error.rs

//! Unified error handling for the monitor.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for monitor operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Fetching the monitored page failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Turning the page into canonical text failed
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be constructed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Baseline could not be persisted
    #[error("Storage error for {key}: {message}")]
    Storage { key: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Notification delivery failed
    #[error("Notification error: {0}")]
    Notify(String),
}

impl AppError {
    /// Create a storage error for a baseline key.
    pub fn storage(key: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Storage {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a notification error.
    pub fn notify(message: impl fmt::Display) -> Self {
        Self::Notify(message.to_string())
    }
}

/// Transport-level failures while fetching a page.
///
/// None of these are retried; the caller decides what to do next run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request timed out after {} seconds", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("HTTP error {code}: {reason}")]
    HttpStatus { code: u16, reason: String },

    #[error("Failed to connect to {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    Other(String),
}

/// Failures while reducing markup to canonical text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Selector '{0}' did not match any element")]
    NoMatch(String),
}

impl NormalizeError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }
}
