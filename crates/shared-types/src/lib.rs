//! # Shared Types Crate
//!
//! This crate contains the entities exchanged between the trust-stamp
//! subsystems: message records, identity records, classifications and the
//! storage error shared by every mailbox consumer.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Write-Once Stamp Material**: `digest` and `stamp` are fixed when a
//!   record is composed; `classification` is the only field that changes.
//! - **Owned Copies**: sender and recipient each hold their own record value.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
