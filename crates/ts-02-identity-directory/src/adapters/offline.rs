//! # Offline Directory
//!
//! A directory whose backend is never reachable. Used to exercise the
//! verifier's degrade-to-Unverified path and in diagnostics.

use crate::domain::errors::{DirectoryError, RegistrationError};
use crate::ports::inbound::IdentityDirectory;
use async_trait::async_trait;
use shared_types::{IdentityRecord, OwnerIdentifier, RegistrationReceipt};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

const OFFLINE: &str = "directory backend offline";

/// Every call fails with a transient error.
#[derive(Debug, Default)]
pub struct OfflineDirectory {
    calls: AtomicU64,
}

impl OfflineDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls attempted so far.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    fn fail(&self) -> DirectoryError {
        self.calls.fetch_add(1, Ordering::Relaxed);
        warn!("Directory call while offline");
        DirectoryError::Transient(OFFLINE.to_string())
    }
}

#[async_trait]
impl IdentityDirectory for OfflineDirectory {
    async fn register(
        &self,
        _owner: &str,
        _signer_key: &str,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        Err(RegistrationError::Unavailable(self.fail().to_string()))
    }

    async fn lookup(&self, _signer_key: &str) -> Result<OwnerIdentifier, DirectoryError> {
        Err(self.fail())
    }

    async fn find_by_owner(&self, _owner: &str) -> Result<IdentityRecord, DirectoryError> {
        Err(self.fail())
    }

    async fn query(&self, _text: &str) -> Result<IdentityRecord, DirectoryError> {
        Err(self.fail())
    }

    async fn list_all(&self) -> Result<Vec<IdentityRecord>, DirectoryError> {
        Err(self.fail())
    }
}
