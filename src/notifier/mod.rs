//! Change notifications.
//!
//! The pipeline only decides *whether* the page changed. A [`Notifier`]
//! turns a positive decision into a message for a human.

#[cfg(feature = "smtp")]
pub mod smtp;

use async_trait::async_trait;
use chrono::{DateTime, Local};

use crate::error::Result;

#[cfg(feature = "smtp")]
pub use smtp::SmtpNotifier;

/// Timestamp format used in notification bodies.
const DETECTED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A detected change, ready to be rendered into a message.
#[derive(Debug, Clone)]
pub struct ChangeNotice {
    pub url: String,
    pub detected_at: DateTime<Local>,
}

impl ChangeNotice {
    /// Notice for a change detected now.
    pub fn now(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            detected_at: Local::now(),
        }
    }

    /// Plain-text message body.
    pub fn body(&self) -> String {
        format!(
            "A change has been detected on the monitored page.\n\
             \n\
             URL: {}\n\
             Detected at: {}\n\
             \n\
             Visit the page to see what's new!\n",
            self.url,
            self.detected_at.format(DETECTED_AT_FORMAT)
        )
    }
}

/// Delivery channel for change notices.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `notice`. An error means the recipient was not reached.
    async fn notify(&self, notice: &ChangeNotice) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_body_contents() {
        let notice = ChangeNotice {
            url: "https://example.com/page".into(),
            detected_at: Local.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap(),
        };
        let body = notice.body();
        assert!(body.starts_with("A change has been detected on the monitored page."));
        assert!(body.contains("URL: https://example.com/page\n"));
        assert!(body.contains("Detected at: 2026-03-01 09:30:00\n"));
        assert!(body.ends_with("Visit the page to see what's new!\n"));
    }

    #[test]
    fn test_now_uses_url() {
        let notice = ChangeNotice::now("https://example.com/");
        assert_eq!(notice.url, "https://example.com/");
        assert!(notice.body().contains("Detected at:"));
    }
}
