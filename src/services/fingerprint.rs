//! Content fingerprinting.

use sha2::{Digest, Sha256};

/// Length of a rendered fingerprint (SHA-256 as lowercase hex).
pub const FINGERPRINT_LEN: usize = 64;

/// Compute the SHA-256 fingerprint of canonical content as lowercase hex.
pub fn fingerprint(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
