//! # Identity Check
//!
//! Decides whether the owner a directory returned is the sender a message
//! claims to come from.

use serde::{Deserialize, Serialize};
use shared_types::normalize_address;

/// How the registered owner is compared with the claimed sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IdentityCheck {
    /// Case-insensitive equality of owner and claimed sender.
    #[default]
    Exact,
    /// Case-insensitive search for the owner anywhere in the originally sent
    /// canonical envelope. Accepts an owner mentioned only in the body.
    LegacySubstring,
}

/// Apply `check` to the registry owner and the message's claims.
pub fn identity_matches(
    check: IdentityCheck,
    registered_owner: &str,
    claimed_sender: &str,
    original_envelope: &str,
) -> bool {
    let owner = normalize_address(registered_owner);
    if owner.is_empty() {
        return false;
    }
    match check {
        IdentityCheck::Exact => owner == normalize_address(claimed_sender),
        IdentityCheck::LegacySubstring => original_envelope.to_lowercase().contains(&owner),
    }
}
