//! # Simulated Latency
//!
//! Wraps any directory and delays every call, standing in for the round
//! trip to a remote registry.

use crate::domain::errors::{DirectoryError, RegistrationError};
use crate::ports::inbound::IdentityDirectory;
use async_trait::async_trait;
use shared_types::{IdentityRecord, OwnerIdentifier, RegistrationReceipt};
use std::time::Duration;
use tracing::trace;

/// Directory decorator that sleeps `latency` before delegating.
pub struct LatencyDirectory<D> {
    inner: D,
    latency: Duration,
}

impl<D: IdentityDirectory> LatencyDirectory<D> {
    pub fn new(inner: D, latency: Duration) -> Self {
        Self { inner, latency }
    }

    /// Configured delay per call.
    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            trace!(latency_ms = self.latency.as_millis() as u64, "Simulating directory latency");
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl<D: IdentityDirectory> IdentityDirectory for LatencyDirectory<D> {
    async fn register(
        &self,
        owner: &str,
        signer_key: &str,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        self.delay().await;
        self.inner.register(owner, signer_key).await
    }

    async fn lookup(&self, signer_key: &str) -> Result<OwnerIdentifier, DirectoryError> {
        self.delay().await;
        self.inner.lookup(signer_key).await
    }

    async fn find_by_owner(&self, owner: &str) -> Result<IdentityRecord, DirectoryError> {
        self.delay().await;
        self.inner.find_by_owner(owner).await
    }

    async fn query(&self, text: &str) -> Result<IdentityRecord, DirectoryError> {
        self.delay().await;
        self.inner.query(text).await
    }

    async fn list_all(&self) -> Result<Vec<IdentityRecord>, DirectoryError> {
        self.delay().await;
        self.inner.list_all().await
    }
}
