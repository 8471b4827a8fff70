//! # Domain Layer
//!
//! Pure validation rules with no I/O dependencies.

pub mod errors;
pub mod validation;
