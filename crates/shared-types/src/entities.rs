//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Identity**: `IdentityRecord`, `RegistrationReceipt`
//! - **Mail**: `MessageRecord`, `MessageDraft`, `Mailbox`, `MessageId`
//! - **Verification**: `Classification`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Body shown for a sealed message until it verifies as `Valid`.
pub const SEALED_PLACEHOLDER: &str = "Sealed message. Verify to reveal its content.";

/// Mailbox owner key. Always a normalized (trimmed, lower-cased) address.
pub type UserId = String;

/// Human-facing address an identity is registered under.
pub type OwnerIdentifier = String;

/// Normalize an address for use as a mailbox key or directory entry.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A signer key bound to its claimed owner.
///
/// Both fields are stored lower-cased; comparisons are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Opaque signer token (`0x` + 40 hex chars).
    pub signer_key: String,
    /// Address of the owner.
    pub owner_identifier: OwnerIdentifier,
    /// When the registration was accepted.
    pub registered_at: DateTime<Utc>,
}

impl IdentityRecord {
    /// Build a record, normalizing both identifiers.
    pub fn new(owner_identifier: &str, signer_key: &str) -> Self {
        Self {
            signer_key: normalize_address(signer_key),
            owner_identifier: normalize_address(owner_identifier),
            registered_at: Utc::now(),
        }
    }
}

/// Confirmation returned by a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationReceipt {
    /// The identity as it was stored.
    pub record: IdentityRecord,
}

// =============================================================================
// CLUSTER B: MAIL
// =============================================================================

/// Unique identifier of a message record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub Uuid);

impl MessageId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Result of the most recent verification of a message copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Classification {
    /// Never verified.
    #[default]
    Unclassified,
    /// Stamp matches content and the signer is the claimed sender.
    Valid,
    /// Stamp does not match the current content.
    Tampered,
    /// Stamp material missing, signer unknown, or identity mismatch.
    Unverified,
}

impl Classification {
    /// Whether a verifier has produced this value.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Classification::Unclassified)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Classification::Unclassified => "Unclassified",
            Classification::Valid => "Valid",
            Classification::Tampered => "Tampered",
            Classification::Unverified => "Unverified",
        };
        f.write_str(label)
    }
}

/// Stamp material fixed at composition time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampedContent {
    /// Signer key the stamp is bound to.
    pub signer_key: String,
    /// Hex digest of the canonical envelope.
    pub digest: String,
    /// Placeholder stamp over `digest ++ signer_key`.
    pub stamp: String,
}

/// Fields supplied by the composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDraft {
    pub sender_identifier: String,
    pub recipient_identifier: String,
    pub subject: String,
    pub body: String,
    pub is_sealed: bool,
}

/// A stored message copy.
///
/// `digest` and `stamp` are write-once; `classification` is the only field
/// that changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: MessageId,
    pub sender_identifier: String,
    pub recipient_identifier: String,
    pub subject: String,
    /// Body as first presented; the sealed placeholder when `is_sealed`.
    pub displayed_body: String,
    /// Authoritative plaintext the stamp was computed over.
    pub original_body: String,
    pub signer_key: Option<String>,
    pub digest: Option<String>,
    pub stamp: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub classification: Classification,
    pub is_sealed: bool,
}

impl MessageRecord {
    /// Create a record from a draft and (optional) stamp material.
    pub fn compose(draft: MessageDraft, stamped: Option<StampedContent>) -> Self {
        let displayed_body = if draft.is_sealed {
            SEALED_PLACEHOLDER.to_string()
        } else {
            draft.body.clone()
        };
        let (signer_key, digest, stamp) = match stamped {
            Some(s) => (Some(s.signer_key), Some(s.digest), Some(s.stamp)),
            None => (None, None, None),
        };

        Self {
            id: MessageId::generate(),
            sender_identifier: draft.sender_identifier,
            recipient_identifier: draft.recipient_identifier,
            subject: draft.subject,
            displayed_body,
            original_body: draft.body,
            signer_key,
            digest,
            stamp,
            timestamp: Utc::now(),
            classification: Classification::Unclassified,
            is_sealed: draft.is_sealed,
        }
    }

    /// Both a stamp and a signer key are present and non-empty.
    pub fn has_stamp_material(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.stamp) && present(&self.signer_key)
    }

    /// Body a reader should see right now.
    ///
    /// Sealed messages reveal the original only once classified `Valid`.
    pub fn visible_body(&self) -> &str {
        if !self.is_sealed || self.classification == Classification::Valid {
            &self.original_body
        } else {
            &self.displayed_body
        }
    }
}

/// Per-user message collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mailbox {
    pub sent: Vec<MessageRecord>,
    pub received: Vec<MessageRecord>,
}

impl Mailbox {
    /// Find a copy in either collection, preferring the received one.
    ///
    /// A message a user sends to themselves has a copy in each folder.
    pub fn find(&self, id: &MessageId) -> Option<&MessageRecord> {
        self.received
            .iter()
            .chain(self.sent.iter())
            .find(|m| m.id == *id)
    }

    /// Every copy with `id`, across both collections.
    pub fn copies_mut(&mut self, id: MessageId) -> impl Iterator<Item = &mut MessageRecord> {
        self.received
            .iter_mut()
            .chain(self.sent.iter_mut())
            .filter(move |m| m.id == id)
    }
}

/// Sort newest first.
pub fn newest_first(mut records: Vec<MessageRecord>) -> Vec<MessageRecord> {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    records
}
