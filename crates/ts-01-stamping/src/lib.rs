//! # Stamping Subsystem (TS-01)
//!
//! Turns message text into the material a verifier can later recompute:
//!
//! ```text
//! raw fields ──► canonicalize ──► content_digest ──► trust_stamp
//!                (CRLF→LF, trim)   (SHA-256 hex)     (rolling checksum)
//! ```
//!
//! ## Architecture
//!
//! Everything here is pure domain logic with no I/O. The directory and the
//! store live in their own subsystems; this crate only computes values.
//!
//! ## Security Notes
//!
//! - The digest is a real SHA-256.
//! - The stamp is NOT a signature. It is a 32-bit checksum anyone can
//!   recompute from public inputs and stands in for an asymmetric signature.

pub mod domain;

// Re-export public API
pub use domain::canonical::{canonical_envelope, canonicalize};
pub use domain::digest::content_digest;
pub use domain::stamp::{stamp_envelope, trust_stamp, StampMaterial};
