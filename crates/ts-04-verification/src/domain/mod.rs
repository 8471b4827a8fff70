//! # Domain Layer
//!
//! Pure verification rules with no I/O dependencies.

pub mod errors;
pub mod identity;
pub mod outcome;
pub mod pipeline;
pub mod tracker;
