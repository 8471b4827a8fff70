//! # Store Notifier
//!
//! Decorator that announces every successful write as a local
//! `MailboxChanged` event.

use crate::ports::outbound::MessageStore;
use shared_bus::{ChangeOrigin, InMemoryEventBus, MailEvent};
use shared_types::{normalize_address, Classification, MessageId, MessageRecord, StoreError};
use std::sync::Arc;

/// Wraps a store and publishes `MailboxChanged { origin: Local }` after writes.
pub struct StoreNotifier<S> {
    inner: S,
    bus: Arc<InMemoryEventBus>,
}

impl<S: MessageStore> StoreNotifier<S> {
    pub fn new(inner: S, bus: Arc<InMemoryEventBus>) -> Self {
        Self { inner, bus }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn changed(&self, user_id: &str, message_id: MessageId) {
        self.bus.emit(MailEvent::MailboxChanged {
            user_id: normalize_address(user_id),
            message_id: Some(message_id),
            origin: ChangeOrigin::Local,
        });
    }
}

impl<S: MessageStore> MessageStore for StoreNotifier<S> {
    fn save_outbound(&self, user_id: &str, record: MessageRecord) -> Result<(), StoreError> {
        let id = record.id;
        self.inner.save_outbound(user_id, record)?;
        self.changed(user_id, id);
        Ok(())
    }

    fn save_inbound(&self, user_id: &str, record: MessageRecord) -> Result<(), StoreError> {
        let id = record.id;
        self.inner.save_inbound(user_id, record)?;
        self.changed(user_id, id);
        Ok(())
    }

    fn list_inbound(&self, user_id: &str) -> Result<Vec<MessageRecord>, StoreError> {
        self.inner.list_inbound(user_id)
    }

    fn list_sent(&self, user_id: &str) -> Result<Vec<MessageRecord>, StoreError> {
        self.inner.list_sent(user_id)
    }

    fn get(&self, user_id: &str, message_id: &MessageId) -> Result<MessageRecord, StoreError> {
        self.inner.get(user_id, message_id)
    }

    fn update_classification(
        &self,
        user_id: &str,
        message_id: &MessageId,
        classification: Classification,
    ) -> Result<MessageRecord, StoreError> {
        let updated = self
            .inner
            .update_classification(user_id, message_id, classification)?;
        self.changed(user_id, *message_id);
        Ok(updated)
    }
}
