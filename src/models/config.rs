//! Application configuration structures.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::WatchTarget;
use crate::utils::validate_http_url;

/// Dotenv file read by [`Config::load_layered`], relative to the working
/// directory.
pub const DOTENV_FILE: &str = ".env";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Page to watch and how to fetch it
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Where the baseline fingerprint lives
    #[serde(default)]
    pub storage: StorageConfig,

    /// SMTP delivery settings
    #[serde(default)]
    pub email: EmailConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load the optional TOML file at `path`, then `.env` from the working
    /// directory, then the process environment. Later layers win.
    ///
    /// A missing file means defaults; a file that exists but cannot be read or
    /// parsed is an error.
    pub fn load_layered(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::load(path)?
        } else {
            log::debug!("No config file at {:?}, using defaults", path);
            Self::default()
        };
        config.apply_env_file(DOTENV_FILE)?;
        config.apply_env()?;
        Ok(config)
    }

    /// Apply `KEY=value` overrides from a dotenv file.
    ///
    /// Returns `false` when the file does not exist. The process environment
    /// is not modified.
    pub fn apply_env_file(&mut self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();
        let entries = match dotenvy::from_path_iter(path) {
            Ok(entries) => entries,
            Err(e) if e.not_found() => return Ok(false),
            Err(e) => {
                return Err(AppError::config(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )));
            }
        };

        let vars = entries
            .collect::<std::result::Result<HashMap<String, String>, _>>()
            .map_err(|e| AppError::config(format!("Invalid {}: {e}", path.display())))?;
        self.apply_overrides(|name| vars.get(name).cloned())?;
        log::debug!("Loaded {} variables from {}", vars.len(), path.display());
        Ok(true)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Variable names match the ones used by the cron deployment
    /// (`MONITOR_URL`, `EMAIL_FROM`, ...).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("MONITOR_URL") {
            self.monitor.url = url.trim().to_string();
        }
        if let Some(selector) = lookup("CHECK_SELECTOR") {
            let selector = selector.trim();
            self.monitor.selector = (!selector.is_empty()).then(|| selector.to_string());
        }
        if let Some(value) = lookup("REQUEST_TIMEOUT_SECS") {
            self.monitor.timeout_secs = value.trim().parse().map_err(|_| {
                AppError::config(format!("Invalid REQUEST_TIMEOUT_SECS value: {value}"))
            })?;
        }
        if let Some(agent) = lookup("USER_AGENT") {
            self.monitor.user_agent = agent;
        }
        if let Some(path) = lookup("HASH_STORAGE_PATH") {
            self.storage.hash_path = path;
        }
        if let Some(from) = lookup("EMAIL_FROM") {
            self.email.from = from.trim().to_string();
        }
        if let Some(to) = lookup("EMAIL_TO") {
            self.email.to = to.trim().to_string();
        }
        if let Some(password) = lookup("EMAIL_PASSWORD") {
            self.email.password = password;
        }
        if let Some(host) = lookup("EMAIL_SMTP_HOST") {
            self.email.smtp_host = host.trim().to_string();
        }
        if let Some(value) = lookup("EMAIL_SMTP_PORT") {
            self.email.smtp_port = value.trim().parse().map_err(|_| {
                AppError::config(format!("Invalid EMAIL_SMTP_PORT value: {value}"))
            })?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("monitor.url", self.monitor.url.as_str()),
            ("email.from", self.email.from.as_str()),
            ("email.to", self.email.to.as_str()),
            ("email.password", self.email.password.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(AppError::config(format!(
                "Missing required settings: {}",
                missing.join(", ")
            )));
        }

        validate_http_url(&self.monitor.url)?;

        if !self.email.from.contains('@') {
            return Err(AppError::config(
                "Invalid email.from: must be a valid email address",
            ));
        }
        if !self.email.to.contains('@') {
            return Err(AppError::config(
                "Invalid email.to: must be a valid email address",
            ));
        }
        if self.email.smtp_port == 0 {
            return Err(AppError::config(
                "Invalid email.smtp_port: must be between 1 and 65535",
            ));
        }
        if self.monitor.timeout_secs == 0 {
            return Err(AppError::config(
                "Invalid monitor.timeout_secs: must be greater than 0",
            ));
        }
        if self.monitor.user_agent.trim().is_empty() {
            return Err(AppError::config("Invalid monitor.user_agent: must not be empty"));
        }
        Ok(())
    }

    /// The page, scope and baseline key this configuration watches.
    pub fn watch_target(&self) -> WatchTarget {
        WatchTarget {
            url: self.monitor.url.clone(),
            selector: self.monitor.selector.clone(),
            baseline_key: self.storage.hash_path.clone(),
        }
    }
}

/// Monitored page and HTTP behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Absolute http(s) URL of the page to watch
    #[serde(default)]
    pub url: String,

    /// Optional CSS selector narrowing the watched region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            selector: None,
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Baseline persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// File holding the last known fingerprint
    #[serde(default = "defaults::hash_path")]
    pub hash_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            hash_path: defaults::hash_path(),
        }
    }
}

/// SMTP delivery settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Sender address, also used as the SMTP login
    #[serde(default)]
    pub from: String,

    /// Recipient address
    #[serde(default)]
    pub to: String,

    /// SMTP password (an app password for Gmail)
    #[serde(default)]
    pub password: String,

    #[serde(default = "defaults::smtp_host")]
    pub smtp_host: String,

    #[serde(default = "defaults::smtp_port")]
    pub smtp_port: u16,

    /// Subject line of change alerts
    #[serde(default = "defaults::subject")]
    pub subject: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            from: String::new(),
            to: String::new(),
            password: String::new(),
            smtp_host: defaults::smtp_host(),
            smtp_port: defaults::smtp_port(),
            subject: defaults::subject(),
        }
    }
}

// Keeps the password out of logs.
impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("password", &"<redacted>")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("subject", &self.subject)
            .finish()
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter (`error`, `warn`, `info`, `debug`)
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    // Monitor defaults
    pub fn timeout() -> u64 {
        30
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
            .into()
    }

    // Storage defaults
    pub fn hash_path() -> String {
        "last_hash.txt".into()
    }

    // Email defaults
    pub fn smtp_host() -> String {
        "smtp.gmail.com".into()
    }
    pub fn smtp_port() -> u16 {
        465
    }
    pub fn subject() -> String {
        "🔔 Developer Update Detected".into()
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
}
