//! # Verification Outcomes

use serde::{Deserialize, Serialize};
use shared_types::{Classification, MessageId};
use std::fmt;

/// Reason attached to a `Valid` outcome.
pub const VERIFIED_REASON: &str = "sender and content verified";

/// Why a message did not verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationFailure {
    /// No stamp or no signer key on the record.
    MissingStampMaterial,
    /// The directory has no entry for the signer key.
    NotRegistered,
    /// The directory stayed unreachable through every attempt.
    DirectoryUnavailable,
    /// The stamp does not match the current content.
    ContentMismatch,
    /// The registered owner is not the claimed sender.
    IdentityMismatch,
}

impl VerificationFailure {
    /// Classification this failure produces.
    pub fn classification(&self) -> Classification {
        match self {
            VerificationFailure::ContentMismatch => Classification::Tampered,
            _ => Classification::Unverified,
        }
    }

    /// Human-readable reason shown to the reader.
    pub fn reason(&self) -> &'static str {
        match self {
            VerificationFailure::MissingStampMaterial => "missing stamp material",
            VerificationFailure::NotRegistered => "signer not registered",
            VerificationFailure::DirectoryUnavailable => "directory unavailable",
            VerificationFailure::ContentMismatch => {
                "signature does not match recomputed content hash"
            }
            VerificationFailure::IdentityMismatch => {
                "identity mismatch between claimed sender and registry"
            }
        }
    }
}

impl fmt::Display for VerificationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// Result of one verification attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub message_id: MessageId,
    pub classification: Classification,
    pub reason: String,
    /// `None` when the message verified.
    pub failure: Option<VerificationFailure>,
    /// Digest recomputed from the content that was checked.
    pub fresh_digest: String,
    /// Owner the directory returned, when the lookup got that far.
    pub registered_owner: Option<String>,
}

impl VerificationOutcome {
    pub fn verified(message_id: MessageId, fresh_digest: String, registered_owner: String) -> Self {
        Self {
            message_id,
            classification: Classification::Valid,
            reason: VERIFIED_REASON.to_string(),
            failure: None,
            fresh_digest,
            registered_owner: Some(registered_owner),
        }
    }

    pub fn failed(
        message_id: MessageId,
        failure: VerificationFailure,
        fresh_digest: String,
        registered_owner: Option<String>,
    ) -> Self {
        Self {
            message_id,
            classification: failure.classification(),
            reason: failure.reason().to_string(),
            failure: Some(failure),
            fresh_digest,
            registered_owner,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.classification == Classification::Valid
    }
}
