//! Baseline storage.
//!
//! A baseline is the fingerprint recorded by the most recent evaluation that
//! established or changed it. Each key holds exactly one value.
//!
//! Read failures of any kind are reported as "no baseline" so a deleted or
//! corrupted baseline heals itself by re-baselining on the next run. Write
//! failures always propagate.

pub mod local;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;

// Re-export for convenience
pub use local::LocalStorage;
pub use memory::MemoryStorage;

/// Trait for baseline storage backends.
#[async_trait]
pub trait BaselineStore: Send + Sync {
    /// Load the stored fingerprint for `key`, trimmed of surrounding whitespace.
    ///
    /// Returns `None` when nothing is stored or the read fails. An existing but
    /// blank record is returned as `Some("")`.
    async fn load(&self, key: &str) -> Option<String>;

    /// Persist `fingerprint` under `key`, replacing any previous value.
    async fn save(&self, key: &str, fingerprint: &str) -> Result<()>;
}

/// Trim a stored payload. A blank payload is an empty baseline, not a missing one.
pub(crate) fn clean_stored(raw: &str) -> String {
    raw.trim().to_string()
}
