//! # Verification Pipeline
//!
//! The pure steps of a verification. The service supplies the directory
//! answer; everything else is recomputed here from the record.

use super::identity::{identity_matches, IdentityCheck};
use super::outcome::VerificationFailure;
use shared_types::MessageRecord;
use ts_01_stamping::{canonical_envelope, content_digest, trust_stamp};

/// Sender the envelope is rebuilt with: the claimed sender, or the signer
/// key when the record has no sender.
pub fn claimed_sender(record: &MessageRecord) -> &str {
    if !record.sender_identifier.trim().is_empty() {
        &record.sender_identifier
    } else {
        record.signer_key.as_deref().unwrap_or_default()
    }
}

/// Digest of the envelope rebuilt around `current_body`.
pub fn fresh_digest(record: &MessageRecord, current_body: &str) -> String {
    content_digest(&canonical_envelope(
        claimed_sender(record),
        &record.recipient_identifier,
        &record.subject,
        current_body,
    ))
}

/// Envelope exactly as it was stamped at send time.
pub fn original_envelope(record: &MessageRecord) -> String {
    canonical_envelope(
        claimed_sender(record),
        &record.recipient_identifier,
        &record.subject,
        &record.original_body,
    )
}

/// Judge a record whose signer resolved to `registered_owner`.
///
/// Content is checked before identity, so an edited message from the wrong
/// sender reports as tampered.
pub fn judge(
    record: &MessageRecord,
    fresh_digest: &str,
    registered_owner: &str,
    check: IdentityCheck,
) -> Result<(), VerificationFailure> {
    let (Some(signer_key), Some(stored_stamp)) = (&record.signer_key, &record.stamp) else {
        return Err(VerificationFailure::MissingStampMaterial);
    };

    if trust_stamp(fresh_digest, signer_key) != *stored_stamp {
        return Err(VerificationFailure::ContentMismatch);
    }

    if !identity_matches(
        check,
        registered_owner,
        &record.sender_identifier,
        &original_envelope(record),
    ) {
        return Err(VerificationFailure::IdentityMismatch);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{MessageDraft, StampedContent};
    use ts_01_stamping::stamp_envelope;

    const KEY: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

    fn stamped(from: &str, body: &str) -> MessageRecord {
        let material = stamp_envelope(from, "bob@x.com", "hi", body, KEY);
        MessageRecord::compose(
            MessageDraft {
                sender_identifier: from.into(),
                recipient_identifier: "bob@x.com".into(),
                subject: "hi".into(),
                body: body.into(),
                is_sealed: false,
            },
            Some(StampedContent {
                signer_key: KEY.into(),
                digest: material.digest,
                stamp: material.stamp,
            }),
        )
    }

    #[test]
    fn test_unchanged_content_digest_matches_stored() {
        let record = stamped("alice@x.com", "hello");
        assert_eq!(Some(fresh_digest(&record, "hello")), record.digest);
        assert_ne!(Some(fresh_digest(&record, "hello!")), record.digest);
        // Line-ending differences are not edits
        assert_eq!(Some(fresh_digest(&record, "hello\r\n")), record.digest);
    }

    #[test]
    fn test_judge_valid() {
        let record = stamped("alice@x.com", "hello");
        let digest = fresh_digest(&record, "hello");
        assert_eq!(judge(&record, &digest, "alice@x.com", IdentityCheck::Exact), Ok(()));
    }

    #[test]
    fn test_judge_tampered_before_identity() {
        let record = stamped("alice@x.com", "hello");
        let digest = fresh_digest(&record, "hello!");
        assert_eq!(
            judge(&record, &digest, "mallory@x.com", IdentityCheck::Exact),
            Err(VerificationFailure::ContentMismatch)
        );
    }

    #[test]
    fn test_judge_identity_mismatch() {
        let record = stamped("mallory@x.com", "hello");
        let digest = fresh_digest(&record, "hello");
        assert_eq!(
            judge(&record, &digest, "alice@x.com", IdentityCheck::Exact),
            Err(VerificationFailure::IdentityMismatch)
        );
    }

    #[test]
    fn test_sender_falls_back_to_signer_key() {
        let mut record = stamped("alice@x.com", "hello");
        record.sender_identifier = String::new();
        assert_eq!(claimed_sender(&record), KEY);
    }

    #[test]
    fn test_missing_material() {
        let mut record = stamped("alice@x.com", "hello");
        record.stamp = None;
        assert_eq!(
            judge(&record, "d", "alice@x.com", IdentityCheck::Exact),
            Err(VerificationFailure::MissingStampMaterial)
        );
    }
}
