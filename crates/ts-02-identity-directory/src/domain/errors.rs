//! # Directory Errors

use thiserror::Error;

/// Why a registration was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistrationError {
    /// A required value was empty.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A value has the wrong shape.
    #[error("Invalid {field}: {value}")]
    InvalidFormat { field: &'static str, value: String },

    /// The owner or the key is already bound.
    #[error("Already registered: {value}")]
    AlreadyRegistered { value: String },

    /// The backing directory could not be reached.
    #[error("Directory unavailable: {0}")]
    Unavailable(String),
}

/// Errors from directory queries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryError {
    /// No identity matches.
    #[error("Identity not found: {0}")]
    NotFound(String),

    /// The backend is temporarily unreachable. Callers may retry.
    #[error("Directory temporarily unavailable: {0}")]
    Transient(String),
}

impl DirectoryError {
    /// Whether retrying the same call can succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, DirectoryError::Transient(_))
    }
}
