//! # Inbound Ports (Driving Ports / API)
//!
//! The directory API consumed by the composer and the verifier.

use crate::domain::errors::{DirectoryError, RegistrationError};
use async_trait::async_trait;
use shared_types::{IdentityRecord, OwnerIdentifier, RegistrationReceipt};

/// Signer key registry.
///
/// Implementations must be thread-safe (`Send + Sync`). Every method is
/// async because a real backend sits across a network hop.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Bind `signer_key` to `owner`.
    ///
    /// Fails with `MissingField`, then `InvalidFormat` (owner, then key), then
    /// `AlreadyRegistered` if either value is already present.
    async fn register(
        &self,
        owner: &str,
        signer_key: &str,
    ) -> Result<RegistrationReceipt, RegistrationError>;

    /// Owner registered for `signer_key` (case-insensitive).
    async fn lookup(&self, signer_key: &str) -> Result<OwnerIdentifier, DirectoryError>;

    /// Identity registered under `owner` (case-insensitive).
    async fn find_by_owner(&self, owner: &str) -> Result<IdentityRecord, DirectoryError>;

    /// Identity whose owner or key equals `text`.
    async fn query(&self, text: &str) -> Result<IdentityRecord, DirectoryError>;

    /// Every registered identity, sorted by owner.
    async fn list_all(&self) -> Result<Vec<IdentityRecord>, DirectoryError>;
}

#[async_trait]
impl<D: IdentityDirectory + ?Sized> IdentityDirectory for std::sync::Arc<D> {
    async fn register(
        &self,
        owner: &str,
        signer_key: &str,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        (**self).register(owner, signer_key).await
    }

    async fn lookup(&self, signer_key: &str) -> Result<OwnerIdentifier, DirectoryError> {
        (**self).lookup(signer_key).await
    }

    async fn find_by_owner(&self, owner: &str) -> Result<IdentityRecord, DirectoryError> {
        (**self).find_by_owner(owner).await
    }

    async fn query(&self, text: &str) -> Result<IdentityRecord, DirectoryError> {
        (**self).query(text).await
    }

    async fn list_all(&self) -> Result<Vec<IdentityRecord>, DirectoryError> {
        (**self).list_all().await
    }
}
