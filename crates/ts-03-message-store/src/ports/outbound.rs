//! # Outbound Ports (Driven Ports / SPI)
//!
//! Persistence interface the composer and the verifier write through.

use shared_types::{Classification, MessageId, MessageRecord, StoreError};
use std::sync::Arc;

/// Per-user mailbox persistence.
///
/// `user_id` values are normalized by implementations, so callers may pass
/// addresses in any case.
pub trait MessageStore: Send + Sync {
    /// Store a copy in `user_id`'s sent folder.
    fn save_outbound(&self, user_id: &str, record: MessageRecord) -> Result<(), StoreError>;

    /// Store a copy in `user_id`'s received folder.
    fn save_inbound(&self, user_id: &str, record: MessageRecord) -> Result<(), StoreError>;

    /// Received copies, newest first.
    fn list_inbound(&self, user_id: &str) -> Result<Vec<MessageRecord>, StoreError>;

    /// Sent copies, newest first.
    fn list_sent(&self, user_id: &str) -> Result<Vec<MessageRecord>, StoreError>;

    /// One copy from either folder.
    fn get(&self, user_id: &str, message_id: &MessageId) -> Result<MessageRecord, StoreError>;

    /// Overwrite the classification of one copy; returns the updated record.
    fn update_classification(
        &self,
        user_id: &str,
        message_id: &MessageId,
        classification: Classification,
    ) -> Result<MessageRecord, StoreError>;
}

impl<S: MessageStore + ?Sized> MessageStore for Arc<S> {
    fn save_outbound(&self, user_id: &str, record: MessageRecord) -> Result<(), StoreError> {
        (**self).save_outbound(user_id, record)
    }

    fn save_inbound(&self, user_id: &str, record: MessageRecord) -> Result<(), StoreError> {
        (**self).save_inbound(user_id, record)
    }

    fn list_inbound(&self, user_id: &str) -> Result<Vec<MessageRecord>, StoreError> {
        (**self).list_inbound(user_id)
    }

    fn list_sent(&self, user_id: &str) -> Result<Vec<MessageRecord>, StoreError> {
        (**self).list_sent(user_id)
    }

    fn get(&self, user_id: &str, message_id: &MessageId) -> Result<MessageRecord, StoreError> {
        (**self).get(user_id, message_id)
    }

    fn update_classification(
        &self,
        user_id: &str,
        message_id: &MessageId,
        classification: Classification,
    ) -> Result<MessageRecord, StoreError> {
        (**self).update_classification(user_id, message_id, classification)
    }
}
