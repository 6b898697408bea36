// src/lib.rs

//! pagewatch: web page change monitor
//!
//! Fetches one page, reduces it to noise-free canonical text, fingerprints it
//! and compares the fingerprint with the stored baseline.

pub mod error;
pub mod models;
pub mod notifier;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
