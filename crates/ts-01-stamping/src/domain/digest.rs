//! # Content Digest
//!
//! SHA-256 over the UTF-8 bytes of canonical text.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of `canonical` (64 chars).
///
/// Empty input short-circuits to an empty string rather than the hash of
/// zero bytes, so "no content" never carries a digest.
pub fn content_digest(canonical: &str) -> String {
    if canonical.is_empty() {
        return String::new();
    }
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}
