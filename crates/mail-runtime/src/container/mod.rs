//! # Runtime Container
//!
//! Configuration and construction of the subsystems the runtime wires
//! together.

pub mod config;
pub mod subsystems;

pub use config::{
    ConfigError, DirectoryConfig, LoggingConfig, RuntimeConfig, StorageConfig, VerificationConfig,
};
pub use subsystems::{build_directory, with_publishing, SharedDirectory, SharedStore};
