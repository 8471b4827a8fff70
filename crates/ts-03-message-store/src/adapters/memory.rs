//! # In-Memory Message Store

use crate::domain::mailbox::{self, Folder};
use crate::ports::outbound::MessageStore;
use shared_types::{
    newest_first, normalize_address, Classification, Mailbox, MessageId, MessageRecord, StoreError,
    UserId,
};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// In-memory implementation of `MessageStore` for tests and the demo.
pub struct InMemoryMessageStore {
    mailboxes: RwLock<HashMap<UserId, Mailbox>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self {
            mailboxes: RwLock::new(HashMap::new()),
        }
    }

    fn save(&self, user_id: &str, folder: Folder, record: MessageRecord) -> Result<(), StoreError> {
        let user_id = normalize_address(user_id);
        let mut mailboxes = self
            .mailboxes
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        debug!(user = %user_id, message_id = %record.id, folder = ?folder, "Saving message");
        mailbox::save(mailboxes.entry(user_id).or_default(), folder, record);
        Ok(())
    }

    fn list(&self, user_id: &str, folder: Folder) -> Result<Vec<MessageRecord>, StoreError> {
        let mailboxes = self
            .mailboxes
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        let records = mailboxes
            .get(&normalize_address(user_id))
            .map(|m| match folder {
                Folder::Sent => m.sent.clone(),
                Folder::Received => m.received.clone(),
            })
            .unwrap_or_default();
        Ok(newest_first(records))
    }
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageStore for InMemoryMessageStore {
    fn save_outbound(&self, user_id: &str, record: MessageRecord) -> Result<(), StoreError> {
        self.save(user_id, Folder::Sent, record)
    }

    fn save_inbound(&self, user_id: &str, record: MessageRecord) -> Result<(), StoreError> {
        self.save(user_id, Folder::Received, record)
    }

    fn list_inbound(&self, user_id: &str) -> Result<Vec<MessageRecord>, StoreError> {
        self.list(user_id, Folder::Received)
    }

    fn list_sent(&self, user_id: &str) -> Result<Vec<MessageRecord>, StoreError> {
        self.list(user_id, Folder::Sent)
    }

    fn get(&self, user_id: &str, message_id: &MessageId) -> Result<MessageRecord, StoreError> {
        let user_id = normalize_address(user_id);
        let mailboxes = self
            .mailboxes
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        let empty = Mailbox::default();
        mailbox::find(mailboxes.get(&user_id).unwrap_or(&empty), &user_id, message_id)
    }

    fn update_classification(
        &self,
        user_id: &str,
        message_id: &MessageId,
        classification: Classification,
    ) -> Result<MessageRecord, StoreError> {
        let user_id = normalize_address(user_id);
        let mut mailboxes = self
            .mailboxes
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        let Some(mailbox) = mailboxes.get_mut(&user_id) else {
            return Err(StoreError::MessageNotFound {
                user_id,
                message_id: *message_id,
            });
        };
        mailbox::classify(mailbox, &user_id, message_id, classification)
    }
}
