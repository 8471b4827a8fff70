//! # Verification Errors

use shared_types::StoreError;
use thiserror::Error;

/// Failures that stop a verification call from producing an outcome.
///
/// A tampered or unregistered message is not an error; it is an outcome.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VerifyError {
    /// The message could not be read or its classification not written.
    #[error("Message store error: {0}")]
    Store(#[from] StoreError),

    /// No user is signed in to verify on behalf of.
    #[error("No active user")]
    NoActiveUser,
}
