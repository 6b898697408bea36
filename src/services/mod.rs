//! Change-detection services.
//!
//! - `fetcher`: retrieve raw page markup
//! - `normalizer`: reduce markup to canonical text
//! - `fingerprint`: digest canonical text

pub mod fetcher;
pub mod fingerprint;
pub mod normalizer;

pub use fetcher::{HttpFetcher, PageFetcher};
pub use fingerprint::{FINGERPRINT_LEN, fingerprint};
pub use normalizer::normalize;
