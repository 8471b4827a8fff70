//! # Inbound Ports (Driving Ports / API)

use crate::domain::errors::VerifyError;
use crate::domain::outcome::VerificationOutcome;
use async_trait::async_trait;
use shared_types::{MessageId, MessageRecord};

/// Primary verification API.
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait VerificationApi: Send + Sync {
    /// Judge `record` against `current_body` without touching any store.
    async fn evaluate(&self, record: &MessageRecord, current_body: &str) -> VerificationOutcome;

    /// Verify `user_id`'s copy of a message and write the classification back.
    async fn verify(
        &self,
        user_id: &str,
        message_id: &MessageId,
        current_body: &str,
    ) -> Result<VerificationOutcome, VerifyError>;
}
