//! Cross-subsystem integration tests.

pub mod file_store;
pub mod flows;
