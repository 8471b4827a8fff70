//! # Mailbox Rules
//!
//! Mutations applied identically by every store adapter.

use shared_types::{Classification, Mailbox, MessageId, MessageRecord, StoreError};

/// Which collection of a mailbox a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Folder {
    Sent,
    Received,
}

/// Insert `record` into `folder`, replacing any copy with the same id.
pub fn save(mailbox: &mut Mailbox, folder: Folder, record: MessageRecord) {
    let collection = match folder {
        Folder::Sent => &mut mailbox.sent,
        Folder::Received => &mut mailbox.received,
    };
    match collection.iter_mut().find(|m| m.id == record.id) {
        Some(existing) => *existing = record,
        None => collection.push(record),
    }
}

/// Set the classification of every copy of `message_id` and return the one
/// `find` would return.
pub fn classify(
    mailbox: &mut Mailbox,
    user_id: &str,
    message_id: &MessageId,
    classification: Classification,
) -> Result<MessageRecord, StoreError> {
    let mut updated = 0;
    for record in mailbox.copies_mut(*message_id) {
        record.classification = classification;
        updated += 1;
    }
    if updated == 0 {
        return Err(StoreError::MessageNotFound {
            user_id: user_id.to_string(),
            message_id: *message_id,
        });
    }
    find(mailbox, user_id, message_id)
}

/// Look up one copy by id.
pub fn find(mailbox: &Mailbox, user_id: &str, message_id: &MessageId) -> Result<MessageRecord, StoreError> {
    mailbox
        .find(message_id)
        .cloned()
        .ok_or_else(|| StoreError::MessageNotFound {
            user_id: user_id.to_string(),
            message_id: *message_id,
        })
}
