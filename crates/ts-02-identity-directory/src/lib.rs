//! # Identity Directory Subsystem (TS-02)
//!
//! Maps signer keys to the owner address they were registered under.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Registration validation and error types
//! - **Ports Layer** (`ports/`): The `IdentityDirectory` trait
//! - **Adapters Layer** (`adapters/`): In-memory store, simulated latency,
//!   an always-offline stub, and a bus-publishing decorator
//!
//! ## Invariants
//!
//! - At most one owner per signer key, and one key per owner.
//! - Entries are never updated in place or removed.
//! - Keys and owners compare case-insensitively.

pub mod adapters;
pub mod domain;
pub mod ports;

// Re-export public API
pub use adapters::bus::PublishingDirectory;
pub use adapters::latency::LatencyDirectory;
pub use adapters::memory::InMemoryDirectory;
pub use adapters::offline::OfflineDirectory;
pub use domain::errors::{DirectoryError, RegistrationError};
pub use domain::validation::{is_valid_owner, is_valid_signer_key, validate_registration};
pub use ports::inbound::IdentityDirectory;
