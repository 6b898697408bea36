// src/models/mod.rs

//! Domain models for the monitor.

mod config;
mod evaluation;

// Re-export all public types
pub use config::{Config, EmailConfig, LoggingConfig, MonitorConfig, StorageConfig};
pub use evaluation::{ChangeReason, EvaluationResult, WatchTarget};
