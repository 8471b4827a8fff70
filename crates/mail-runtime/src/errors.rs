//! # Runtime Errors

use crate::container::ConfigError;
use shared_types::StoreError;
use thiserror::Error;
use ts_02_identity_directory::RegistrationError;

/// Why a message could not be sent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SendError {
    /// `to`, `subject` or `body` was empty.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The recipient is not a deliverable address.
    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),

    /// No sender given and nobody is signed in.
    #[error("No active user")]
    NoActiveUser,

    /// The sender's copy could not be stored.
    #[error("Message store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors reading the signed-in user's mailbox.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MailboxError {
    #[error("No active user")]
    NoActiveUser,

    #[error("Message store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors building a runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A seed identity failed registration.
    #[error("Seed identity rejected: {0}")]
    Seed(#[from] RegistrationError),

    #[error("Message store error: {0}")]
    Store(#[from] StoreError),
}
