//! # Trust Stamp
//!
//! A 32-bit rolling checksum binding a digest to a signer key.
//!
//! ## Security Notes
//!
//! This is a placeholder for an asymmetric signature. Anyone who knows the
//! digest and the (public) signer key can produce a matching stamp. Replace it
//! with a real signature scheme before trusting it.

use super::canonical::canonical_envelope;
use super::digest::content_digest;
use serde::{Deserialize, Serialize};
use shared_types::StampedContent;
use tracing::trace;

/// Digest and stamp computed for one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampMaterial {
    pub digest: String,
    pub stamp: String,
}

impl StampMaterial {
    /// Attach the signer key to produce what a message record stores.
    pub fn bind(self, signer_key: &str) -> StampedContent {
        StampedContent {
            signer_key: signer_key.to_string(),
            digest: self.digest,
            stamp: self.stamp,
        }
    }
}

/// Compute the stamp for `digest` under `signer_key`.
///
/// Folds the UTF-16 code units of `digest ++ signer_key` through
/// `h = h * 31 + unit` with 32-bit wraparound, then renders `|h|` as
/// lowercase hex. Either input empty yields an empty stamp.
pub fn trust_stamp(digest: &str, signer_key: &str) -> String {
    if digest.is_empty() || signer_key.is_empty() {
        return String::new();
    }
    let h = digest
        .encode_utf16()
        .chain(signer_key.encode_utf16())
        .fold(0i32, |h, unit| {
            h.wrapping_mul(31).wrapping_add(i32::from(unit))
        });
    render(h)
}

// |i32::MIN| does not fit in i32, so widen first.
fn render(h: i32) -> String {
    format!("{:x}", i64::from(h).abs())
}

/// Canonicalize, hash and stamp a message in one step.
pub fn stamp_envelope(
    from: &str,
    to: &str,
    subject: &str,
    body: &str,
    signer_key: &str,
) -> StampMaterial {
    let canonical = canonical_envelope(from, to, subject, body);
    let digest = content_digest(&canonical);
    let stamp = trust_stamp(&digest, signer_key);
    trace!(digest = %digest, stamp = %stamp, "Envelope stamped");
    StampMaterial { digest, stamp }
}
