//! # Event Bus Adapter
//!
//! Announces successful registrations on the shared bus.

use crate::domain::errors::{DirectoryError, RegistrationError};
use crate::ports::inbound::IdentityDirectory;
use async_trait::async_trait;
use shared_bus::{EventPublisher, MailEvent};
use shared_types::{IdentityRecord, OwnerIdentifier, RegistrationReceipt};
use std::sync::Arc;
use tracing::debug;

/// Directory decorator that publishes `IdentityRegistered`.
pub struct PublishingDirectory<D> {
    inner: D,
    publisher: Arc<dyn EventPublisher>,
}

impl<D: IdentityDirectory> PublishingDirectory<D> {
    pub fn new(inner: D, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { inner, publisher }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }
}

#[async_trait]
impl<D: IdentityDirectory> IdentityDirectory for PublishingDirectory<D> {
    async fn register(
        &self,
        owner: &str,
        signer_key: &str,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        let receipt = self.inner.register(owner, signer_key).await?;
        let receivers = self
            .publisher
            .publish(MailEvent::IdentityRegistered {
                owner_identifier: receipt.record.owner_identifier.clone(),
                signer_key: receipt.record.signer_key.clone(),
            })
            .await;
        debug!(receivers, "IdentityRegistered published");
        Ok(receipt)
    }

    async fn lookup(&self, signer_key: &str) -> Result<OwnerIdentifier, DirectoryError> {
        self.inner.lookup(signer_key).await
    }

    async fn find_by_owner(&self, owner: &str) -> Result<IdentityRecord, DirectoryError> {
        self.inner.find_by_owner(owner).await
    }

    async fn query(&self, text: &str) -> Result<IdentityRecord, DirectoryError> {
        self.inner.query(text).await
    }

    async fn list_all(&self) -> Result<Vec<IdentityRecord>, DirectoryError> {
        self.inner.list_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryDirectory;
    use shared_bus::{EventFilter, EventTopic, InMemoryEventBus};

    const KEY: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

    /// Test: only successful registrations are announced
    #[tokio::test]
    async fn test_registration_published_once() {
        let bus = Arc::new(InMemoryEventBus::new());
        let mut sub = bus.subscribe(EventFilter::topics(vec![EventTopic::Directory]));
        let directory = PublishingDirectory::new(InMemoryDirectory::new(), bus.clone());

        directory.register("alice@x.com", KEY).await.unwrap();
        assert!(directory.register("alice@x.com", KEY).await.is_err());

        let events = sub.drain();
        assert_eq!(
            events,
            vec![MailEvent::IdentityRegistered {
                owner_identifier: "alice@x.com".into(),
                signer_key: KEY.into(),
            }]
        );
        assert_eq!(directory.inner().len(), 1);
    }
}
