//! # Verification Subsystem (TS-04)
//!
//! Recomputes the stamping pipeline over a message's current content and
//! checks the signer against the identity directory.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure judgement rules, outcomes, the
//!   stale-result tracker
//! - **Ports Layer** (`ports/`): The `VerificationApi` trait
//! - **Service Layer** (`service.rs`): Directory lookup with retries and
//!   classification write-back
//! - **Adapters Layer** (`adapters/`): Publishes results on the shared bus
//!
//! ## Flow
//!
//! ```text
//! record + current body
//!   │
//!   ├─ recompute digest
//!   ├─ stamp material present? ──no──► Unverified (missing stamp material)
//!   ├─ directory lookup ──miss──► Unverified (signer not registered)
//!   │                  ──down──► Unverified (directory unavailable)
//!   ├─ stamp(fresh digest) == stored? ──no──► Tampered
//!   └─ owner == claimed sender? ──no──► Unverified (identity mismatch)
//!                               ──yes─► Valid
//! ```
//!
//! Pipeline failures are classifications, never errors. Only store access can
//! fail a verification call.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::bus::{EventBusAdapter, VerificationBusAdapter};
pub use domain::errors::VerifyError;
pub use domain::identity::IdentityCheck;
pub use domain::outcome::{VerificationFailure, VerificationOutcome, VERIFIED_REASON};
pub use domain::tracker::{VerificationTicket, VerificationTracker};
pub use ports::inbound::VerificationApi;
pub use service::{VerificationService, VerifierConfig};
