//! # Adapters Layer

pub mod json_file;
pub mod memory;
pub mod notifier;
pub mod watcher;
