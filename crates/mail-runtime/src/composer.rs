//! # Composer
//!
//! Validates a draft, attaches stamp material and stores the sender's and
//! the recipient's copies.
//!
//! ## Signer Key Resolution
//!
//! 1. The key given with the request
//! 2. The key registered for the sender
//! 3. None: the message is stored without stamp material and will verify as
//!    Unverified

use crate::errors::SendError;
use serde::{Deserialize, Serialize};
use shared_bus::{EventPublisher, MailEvent};
use shared_types::{normalize_address, MessageDraft, MessageId, MessageRecord};
use std::sync::Arc;
use tracing::{debug, info, warn};
use ts_01_stamping::stamp_envelope;
use ts_02_identity_directory::{is_valid_owner, DirectoryError, IdentityDirectory};
use ts_03_message_store::MessageStore;

/// A message to send.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRequest {
    /// Sender address. Empty means the signed-in user.
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    /// Hide the body behind a placeholder until the message verifies.
    pub sealed: bool,
    /// Key to stamp with instead of the sender's registered key.
    pub signer_key: Option<String>,
}

/// What the sender gets back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReceipt {
    pub message_id: MessageId,
    pub digest: Option<String>,
    pub stamp: Option<String>,
    /// The recipient's copy was stored.
    pub delivered_to_recipient: bool,
}

/// Builds and stores outgoing messages.
pub struct Composer<D, S> {
    directory: D,
    store: S,
    publisher: Arc<dyn EventPublisher>,
}

impl<D: IdentityDirectory, S: MessageStore> Composer<D, S> {
    pub fn new(directory: D, store: S, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            directory,
            store,
            publisher,
        }
    }

    /// Validate, stamp and store `request` as sent by `sender`.
    pub async fn send(
        &self,
        sender: &str,
        request: SendRequest,
    ) -> Result<(MessageRecord, MessageReceipt), SendError> {
        let sender = normalize_address(sender);
        if sender.is_empty() {
            return Err(SendError::NoActiveUser);
        }
        validate(&request)?;
        let recipient = normalize_address(&request.to);

        self.warn_if_unregistered(&recipient).await;

        let stamped = self
            .resolve_signer_key(&sender, request.signer_key.as_deref())
            .await
            .map(|key| {
                stamp_envelope(&sender, &recipient, &request.subject, &request.body, &key)
                    .bind(&key)
            });
        if stamped.is_none() {
            warn!(sender = %sender, "No signer key available, sending without stamp");
        }

        let record = MessageRecord::compose(
            MessageDraft {
                sender_identifier: sender.clone(),
                recipient_identifier: recipient.clone(),
                subject: request.subject,
                body: request.body,
                is_sealed: request.sealed,
            },
            stamped,
        );

        self.store.save_outbound(&sender, record.clone())?;
        let delivered_to_recipient = match self.store.save_inbound(&recipient, record.clone()) {
            Ok(()) => true,
            Err(e) => {
                warn!(recipient = %recipient, error = %e, "Recipient copy not stored");
                false
            }
        };

        self.publisher
            .publish(MailEvent::MessageSent {
                message_id: record.id,
                sender: sender.clone(),
                recipient: recipient.clone(),
                stamped: record.has_stamp_material(),
            })
            .await;

        info!(
            message_id = %record.id,
            sender = %sender,
            recipient = %recipient,
            stamped = record.has_stamp_material(),
            sealed = record.is_sealed,
            "Message sent"
        );

        let receipt = MessageReceipt {
            message_id: record.id,
            digest: record.digest.clone(),
            stamp: record.stamp.clone(),
            delivered_to_recipient,
        };
        Ok((record, receipt))
    }

    async fn resolve_signer_key(&self, sender: &str, explicit: Option<&str>) -> Option<String> {
        if let Some(key) = explicit.map(normalize_address).filter(|k| !k.is_empty()) {
            return Some(key);
        }
        match self.directory.find_by_owner(sender).await {
            Ok(record) => Some(record.signer_key),
            Err(DirectoryError::NotFound(_)) => None,
            Err(e) => {
                warn!(sender = %sender, error = %e, "Signer key lookup failed");
                None
            }
        }
    }

    async fn warn_if_unregistered(&self, recipient: &str) {
        match self.directory.find_by_owner(recipient).await {
            Ok(_) => {}
            Err(DirectoryError::NotFound(_)) => {
                warn!(recipient = %recipient, "Recipient is not a registered identity");
            }
            Err(e) => debug!(recipient = %recipient, error = %e, "Recipient check skipped"),
        }
    }
}

fn validate(request: &SendRequest) -> Result<(), SendError> {
    if request.to.trim().is_empty() {
        return Err(SendError::MissingField("to"));
    }
    if request.subject.trim().is_empty() {
        return Err(SendError::MissingField("subject"));
    }
    if request.body.trim().is_empty() {
        return Err(SendError::MissingField("body"));
    }
    if !is_valid_owner(request.to.trim()) {
        return Err(SendError::InvalidRecipient(request.to.trim().to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_bus::{EventFilter, EventTopic, InMemoryEventBus};
    use ts_02_identity_directory::{InMemoryDirectory, OfflineDirectory};
    use ts_03_message_store::InMemoryMessageStore;

    const ALICE_KEY: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

    fn request(to: &str, subject: &str, body: &str) -> SendRequest {
        SendRequest {
            from: String::new(),
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            sealed: false,
            signer_key: None,
        }
    }

    fn composer<D: IdentityDirectory>(
        directory: D,
    ) -> (Composer<D, Arc<InMemoryMessageStore>>, Arc<InMemoryMessageStore>) {
        let store = Arc::new(InMemoryMessageStore::new());
        let composer = Composer::new(directory, store.clone(), Arc::new(InMemoryEventBus::new()));
        (composer, store)
    }

    /// Test: validation order and messages
    #[tokio::test]
    async fn test_validation() {
        let (composer, _) = composer(InMemoryDirectory::new());
        let cases = [
            (request("", "s", "b"), SendError::MissingField("to")),
            (request("bob@x.com", " ", "b"), SendError::MissingField("subject")),
            (request("bob@x.com", "s", ""), SendError::MissingField("body")),
            (request("bob", "s", "b"), SendError::InvalidRecipient("bob".into())),
        ];
        for (req, expected) in cases {
            assert_eq!(composer.send("alice@x.com", req).await.unwrap_err(), expected);
        }
        assert_eq!(
            composer.send("", request("bob@x.com", "s", "b")).await.unwrap_err(),
            SendError::NoActiveUser
        );
    }

    /// Test: registered sender's key is used and both copies are stored
    #[tokio::test]
    async fn test_send_uses_registered_key() {
        let directory = InMemoryDirectory::seeded([("alice@x.com", ALICE_KEY)]).unwrap();
        let (composer, store) = composer(directory);

        let (record, receipt) = composer
            .send("Alice@X.com", request("Bob@x.com", "hi", "hello"))
            .await
            .unwrap();

        assert!(receipt.delivered_to_recipient);
        assert_eq!(record.signer_key.as_deref(), Some(ALICE_KEY));
        assert_eq!(receipt.stamp, record.stamp);
        assert_eq!(record.sender_identifier, "alice@x.com");
        assert_eq!(store.list_sent("alice@x.com").unwrap().len(), 1);
        assert_eq!(store.list_inbound("bob@x.com").unwrap()[0].id, receipt.message_id);
    }

    /// Test: unregistered sender without a key sends unstamped
    #[tokio::test]
    async fn test_send_without_key() {
        let (composer, store) = composer(InMemoryDirectory::new());
        let (record, receipt) = composer
            .send("carol@x.com", request("bob@x.com", "hi", "hello"))
            .await
            .unwrap();
        assert!(!record.has_stamp_material());
        assert!(receipt.stamp.is_none());
        assert_eq!(store.list_inbound("bob@x.com").unwrap().len(), 1);
    }

    /// Test: explicit key wins and is normalized; an offline directory is not fatal
    #[tokio::test]
    async fn test_explicit_key_with_offline_directory() {
        let (composer, _) = composer(OfflineDirectory::new());
        let mut req = request("bob@x.com", "hi", "hello");
        req.signer_key = Some(ALICE_KEY.to_uppercase().replacen("0X", "0x", 1));

        let (record, _) = composer.send("alice@x.com", req).await.unwrap();
        assert_eq!(record.signer_key.as_deref(), Some(ALICE_KEY));
        let expected = stamp_envelope("alice@x.com", "bob@x.com", "hi", "hello", ALICE_KEY);
        assert_eq!(record.stamp, Some(expected.stamp));
    }

    /// Test: sealed message stores the placeholder for display
    #[tokio::test]
    async fn test_sealed_send() {
        let (composer, store) = composer(InMemoryDirectory::new());
        let mut req = request("bob@x.com", "secret", "the plan");
        req.sealed = true;
        let (record, _) = composer.send("alice@x.com", req).await.unwrap();

        let stored = store.get("bob@x.com", &record.id).unwrap();
        assert_eq!(stored.displayed_body, shared_types::SEALED_PLACEHOLDER);
        assert_eq!(stored.original_body, "the plan");
    }

    /// Test: MessageSent is published
    #[tokio::test]
    async fn test_message_sent_event() {
        let bus = Arc::new(InMemoryEventBus::new());
        let mut sub = bus.subscribe(EventFilter::topics(vec![EventTopic::Composer]));
        let composer = Composer::new(
            InMemoryDirectory::new(),
            InMemoryMessageStore::new(),
            bus.clone(),
        );
        let (record, _) = composer
            .send("alice@x.com", request("bob@x.com", "hi", "hello"))
            .await
            .unwrap();

        assert_eq!(
            sub.try_recv().unwrap(),
            Some(MailEvent::MessageSent {
                message_id: record.id,
                sender: "alice@x.com".into(),
                recipient: "bob@x.com".into(),
                stamped: false,
            })
        );
    }
}
