//! SMTP notifier.
//!
//! Sends change notices over implicit-TLS SMTP (port 465 by default),
//! authenticating with the sender address and password.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::{AppError, Result};
use crate::models::EmailConfig;
use crate::notifier::{ChangeNotice, Notifier};

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Email notifier backed by an SMTP relay.
pub struct SmtpNotifier {
    from: Mailbox,
    to: Mailbox,
    subject: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    /// Build a notifier from email settings. Addresses are parsed here so a bad
    /// address fails before any page is fetched.
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let from = parse_mailbox("email.from", &config.from)?;
        let to = parse_mailbox("email.to", &config.to)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| AppError::notify(format!("Invalid SMTP host {}: {}", config.smtp_host, e)))?
            .port(config.smtp_port)
            .credentials(Credentials::new(config.from.clone(), config.password.clone()))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        Ok(Self {
            from,
            to,
            subject: config.subject.clone(),
            transport,
        })
    }

    /// Compose the message for `notice`.
    pub fn build_message(&self, notice: &ChangeNotice) -> Result<Message> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(self.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(notice.body())
            .map_err(|e| AppError::notify(format!("Failed to build email: {e}")))
    }
}

fn parse_mailbox(field: &str, address: &str) -> Result<Mailbox> {
    address
        .parse()
        .map_err(|e| AppError::notify(format!("Invalid {field} '{address}': {e}")))
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, notice: &ChangeNotice) -> Result<()> {
        let message = self.build_message(notice)?;
        match self.transport.send(message).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_permanent() => Err(AppError::notify(format!(
                "SMTP server rejected the message (check email.from and email.password; \
                 Gmail requires an App Password): {e}"
            ))),
            Err(e) => Err(AppError::notify(format!("Failed to send email: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email_config() -> EmailConfig {
        EmailConfig {
            from: "sender@example.com".into(),
            to: "recipient@example.com".into(),
            password: "test_password".into(),
            smtp_host: "smtp.example.com".into(),
            smtp_port: 465,
            subject: "Update Detected".into(),
        }
    }

    #[tokio::test]
    async fn test_message_structure() {
        let notifier = SmtpNotifier::new(&email_config()).unwrap();
        let notice = ChangeNotice::now("https://example.com/page");

        let message = notifier.build_message(&notice).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("From: sender@example.com"));
        assert!(raw.contains("To: recipient@example.com"));
        assert!(raw.contains("Subject: Update Detected"));
        assert!(raw.contains("URL: https://example.com/page"));
    }

    #[tokio::test]
    async fn test_invalid_address_is_notify_error() {
        let mut config = email_config();
        config.to = "not an address".into();
        assert!(matches!(
            SmtpNotifier::new(&config),
            Err(AppError::Notify(_))
        ));
    }
}
