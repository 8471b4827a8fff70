//! # Error Types
//!
//! Defines error types used across subsystems.

use crate::entities::MessageId;
use thiserror::Error;

/// Errors that can occur in a message store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No copy with this id in the user's mailbox.
    #[error("Message {message_id} not found for user {user_id}")]
    MessageNotFound {
        user_id: String,
        message_id: MessageId,
    },

    /// Reading or writing the backing files failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// A persisted mailbox could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An internal lock was poisoned by a panicking writer.
    #[error("Store lock poisoned")]
    LockPoisoned,

    /// A mailbox file records a different owner than the one requested.
    #[error("Mailbox file {path} belongs to {found}, not {expected}")]
    OwnerMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// The backing storage cannot be used (missing directory, lock held).
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}
