//! # Message Store Subsystem (TS-03)
//!
//! Persists each user's sent and received message copies along with their
//! last-known classification.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Mailbox mutation rules shared by adapters
//! - **Ports Layer** (`ports/`): The `MessageStore` trait
//! - **Adapters Layer** (`adapters/`): In-memory and JSON-file stores, a
//!   notifying decorator, and a watcher for out-of-process edits
//!
//! ## Invariants
//!
//! - Saves are last-write-wins per message id within a folder.
//! - `classification` is the only field changed after a record is saved.
//! - Listings are newest first.

pub mod adapters;
pub mod domain;
pub mod ports;

// Re-export public API
pub use adapters::json_file::{Fingerprint, JsonFileMessageStore};
pub use adapters::memory::InMemoryMessageStore;
pub use adapters::notifier::StoreNotifier;
pub use adapters::watcher::MailboxWatcher;
pub use domain::mailbox::Folder;
pub use ports::outbound::MessageStore;
