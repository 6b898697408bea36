//! Local filesystem storage implementation.
//!
//! Each key is a path relative to the storage root (an absolute key ignores
//! the root). The file holds the bare 64-character hex fingerprint with no
//! trailing newline.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! └── last_hash.txt         # Baseline fingerprint (default key)
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::{BaselineStore, clean_stored};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Storage rooted at the process working directory, so keys behave as
    /// plain file paths.
    pub fn current_dir() -> Self {
        Self::new(PathBuf::new())
    }

    /// Get the full path for a key.
    pub fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    ///
    /// The temp file is removed if any step after its creation fails.
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = temp_path(&path);
        if let Err(e) = write_and_rename(&tmp, &path, bytes).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(AppError::Io(e));
        }
        Ok(())
    }

    /// Read a key as text, returning None if the file doesn't exist.
    async fn read_string(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

async fn write_and_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(tmp).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await?;
    drop(file);
    tokio::fs::rename(tmp, path).await
}

/// Sibling temp file: `last_hash.txt` -> `last_hash.txt.tmp`.
fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[async_trait]
impl BaselineStore for LocalStorage {
    async fn load(&self, key: &str) -> Option<String> {
        match self.read_string(key).await {
            Ok(Some(text)) => Some(clean_stored(&text)),
            Ok(None) => {
                log::debug!("No baseline found at {}", self.path(key).display());
                None
            }
            Err(e) => {
                log::warn!(
                    "Failed to read baseline at {}: {}. Treating as first run.",
                    self.path(key).display(),
                    e
                );
                None
            }
        }
    }

    async fn save(&self, key: &str, fingerprint: &str) -> Result<()> {
        self.write_bytes(key, fingerprint.as_bytes())
            .await
            .map_err(|e| AppError::storage(self.path(key).display().to_string(), e))?;
        log::debug!("Baseline saved to {}", self.path(key).display());
        Ok(())
    }
}
