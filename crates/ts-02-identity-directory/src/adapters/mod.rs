//! # Adapters Layer
//!
//! Concrete `IdentityDirectory` implementations and decorators.

pub mod bus;
pub mod latency;
pub mod memory;
pub mod offline;
