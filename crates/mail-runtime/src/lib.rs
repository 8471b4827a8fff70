//! # Mail Runtime Library
//!
//! In-process mail client over the trust-stamp subsystems. The `main.rs`
//! binary drives it from the command line.
//!
//! ## Subsystems
//!
//! 1. Stamping (ts-01) - Canonical envelope, digest, trust stamp
//! 2. Identity Directory (ts-02) - Owner to signer key registry
//! 3. Message Store (ts-03) - Per-user sent and received folders
//! 4. Verification (ts-04) - Classification of received messages
//!
//! ## Flow
//!
//! ```text
//! Composer ──MessageSent──→ Event Bus ←──VerificationCompleted── Verifier
//!    │                          ↑                                    │
//!    └──save──→ MessageStore ───┴──MailboxChanged        lookup──→ Directory
//! ```

#![allow(clippy::type_complexity)]

pub mod composer;
pub mod container;
pub mod errors;
pub mod runtime;

pub use composer::{Composer, MessageReceipt, SendRequest};
pub use container::{ConfigError, RuntimeConfig};
pub use errors::{MailboxError, RuntimeError, SendError};
pub use runtime::{MailRuntime, OpenedMessage};
