//! # Domain Layer
//!
//! Pure text and hashing logic with no I/O dependencies.

pub mod canonical;
pub mod digest;
pub mod stamp;
