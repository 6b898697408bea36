//! In-memory storage implementation.
//!
//! Holds baselines for the lifetime of the value only. Used by tests and by
//! embedders that keep state elsewhere.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::error::Result;
use crate::storage::{BaselineStore, clean_stored};

/// Map-backed baseline store.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored payload for `key`, untrimmed.
    pub fn get(&self, key: &str) -> Option<String> {
        self.values().get(key).cloned()
    }

    /// Store a raw payload without going through `save`.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values().insert(key.into(), value.into());
    }

    /// Lock the map, recovering it if a previous holder panicked.
    fn values(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl BaselineStore for MemoryStorage {
    async fn load(&self, key: &str) -> Option<String> {
        self.get(key).as_deref().map(clean_stored)
    }

    async fn save(&self, key: &str, fingerprint: &str) -> Result<()> {
        self.insert(key, fingerprint);
        Ok(())
    }
}
