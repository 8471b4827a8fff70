//! # Registration Validation
//!
//! Shape checks run before the directory is consulted. Order matters: the
//! first failing rule is the one reported.

use super::errors::RegistrationError;

/// Hex characters after the `0x` prefix.
const SIGNER_KEY_HEX_LEN: usize = 40;

/// An owner address must contain both `@` and `.`.
pub fn is_valid_owner(owner: &str) -> bool {
    owner.contains('@') && owner.contains('.')
}

/// A signer key is `0x` followed by exactly 40 hex digits (either case).
pub fn is_valid_signer_key(key: &str) -> bool {
    let Some(body) = key.strip_prefix("0x") else {
        return false;
    };
    body.len() == SIGNER_KEY_HEX_LEN && hex::decode(body).is_ok()
}

/// Validate a registration request. Inputs are trimmed before checking.
///
/// Rules, in order: both present, owner shape, key shape.
pub fn validate_registration(owner: &str, signer_key: &str) -> Result<(), RegistrationError> {
    let owner = owner.trim();
    let signer_key = signer_key.trim();

    if owner.is_empty() {
        return Err(RegistrationError::MissingField("owner"));
    }
    if signer_key.is_empty() {
        return Err(RegistrationError::MissingField("signer_key"));
    }
    if !is_valid_owner(owner) {
        return Err(RegistrationError::InvalidFormat {
            field: "owner",
            value: owner.to_string(),
        });
    }
    if !is_valid_signer_key(signer_key) {
        return Err(RegistrationError::InvalidFormat {
            field: "signer_key",
            value: signer_key.to_string(),
        });
    }
    Ok(())
}
