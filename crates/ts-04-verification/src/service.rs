//! # Verification Service
//!
//! Application service layer that implements the `VerificationApi` trait.
//!
//! Owns the I/O around the pure pipeline: resolving the signer through the
//! directory (retrying transient failures) and writing the classification
//! back to the verifying user's copy.

use crate::domain::errors::VerifyError;
use crate::domain::identity::IdentityCheck;
use crate::domain::outcome::{VerificationFailure, VerificationOutcome};
use crate::domain::pipeline::{fresh_digest, judge};
use crate::ports::inbound::VerificationApi;
use async_trait::async_trait;
use shared_types::{MessageId, MessageRecord, OwnerIdentifier};
use std::time::Duration;
use tracing::{debug, info, warn};
use ts_02_identity_directory::{DirectoryError, IdentityDirectory};
use ts_03_message_store::MessageStore;

/// Tunables for the verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierConfig {
    /// Directory lookups per verification before giving up. At least 1.
    pub lookup_attempts: u32,
    /// Pause between transient failures.
    pub retry_backoff: Duration,
    /// Owner-vs-sender comparison.
    pub identity_check: IdentityCheck,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            lookup_attempts: 3,
            retry_backoff: Duration::from_millis(50),
            identity_check: IdentityCheck::Exact,
        }
    }
}

/// The main verification service.
pub struct VerificationService<D: IdentityDirectory, S: MessageStore> {
    directory: D,
    store: S,
    config: VerifierConfig,
}

impl<D: IdentityDirectory, S: MessageStore> VerificationService<D, S> {
    /// Create a service with default configuration.
    pub fn new(directory: D, store: S) -> Self {
        Self::with_config(directory, store, VerifierConfig::default())
    }

    pub fn with_config(directory: D, store: S, config: VerifierConfig) -> Self {
        Self {
            directory,
            store,
            config,
        }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn resolve_owner(&self, signer_key: &str) -> Result<OwnerIdentifier, VerificationFailure> {
        let attempts = self.config.lookup_attempts.max(1);
        for attempt in 1..=attempts {
            match self.directory.lookup(signer_key).await {
                Ok(owner) => return Ok(owner),
                Err(DirectoryError::NotFound(_)) => return Err(VerificationFailure::NotRegistered),
                Err(DirectoryError::Transient(reason)) => {
                    warn!(
                        signer_key = %signer_key,
                        attempt,
                        attempts,
                        reason = %reason,
                        "Directory lookup failed"
                    );
                    if attempt < attempts && !self.config.retry_backoff.is_zero() {
                        tokio::time::sleep(self.config.retry_backoff).await;
                    }
                }
            }
        }
        Err(VerificationFailure::DirectoryUnavailable)
    }
}

#[async_trait]
impl<D: IdentityDirectory, S: MessageStore> VerificationApi for VerificationService<D, S> {
    async fn evaluate(&self, record: &MessageRecord, current_body: &str) -> VerificationOutcome {
        let digest = fresh_digest(record, current_body);

        if !record.has_stamp_material() {
            return VerificationOutcome::failed(
                record.id,
                VerificationFailure::MissingStampMaterial,
                digest,
                None,
            );
        }
        let signer_key = record.signer_key.as_deref().unwrap_or_default();

        let owner = match self.resolve_owner(signer_key).await {
            Ok(owner) => owner,
            Err(failure) => return VerificationOutcome::failed(record.id, failure, digest, None),
        };

        let outcome = match judge(record, &digest, &owner, self.config.identity_check) {
            Ok(()) => VerificationOutcome::verified(record.id, digest, owner),
            Err(failure) => VerificationOutcome::failed(record.id, failure, digest, Some(owner)),
        };
        debug!(
            message_id = %record.id,
            classification = %outcome.classification,
            reason = %outcome.reason,
            "Message evaluated"
        );
        outcome
    }

    async fn verify(
        &self,
        user_id: &str,
        message_id: &MessageId,
        current_body: &str,
    ) -> Result<VerificationOutcome, VerifyError> {
        let record = self.store.get(user_id, message_id)?;
        let outcome = self.evaluate(&record, current_body).await;

        self.store
            .update_classification(user_id, message_id, outcome.classification)?;

        info!(
            user = %user_id,
            message_id = %message_id,
            classification = %outcome.classification,
            reason = %outcome.reason,
            "Verification completed"
        );
        Ok(outcome)
    }
}
