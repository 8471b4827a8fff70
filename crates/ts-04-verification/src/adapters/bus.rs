//! # Event Bus Adapter
//!
//! Wires the verification service to the shared event bus.
//!
//! ```text
//! verify(user, id, body) ──► [Verification (4)] ──► VerificationCompleted ──► [Event Bus]
//!                                    │                                             │
//!                                    └──► classification write-back        [Mail client]
//! ```

use crate::domain::errors::VerifyError;
use crate::domain::outcome::VerificationOutcome;
use crate::ports::inbound::VerificationApi;
use async_trait::async_trait;
use shared_bus::{EventPublisher, MailEvent};
use shared_types::{normalize_address, MessageId};
use std::sync::Arc;
use tracing::debug;

/// Adapter for publishing verification results to the event bus.
#[async_trait]
pub trait VerificationBusAdapter: Send + Sync {
    /// Verify and publish the result.
    ///
    /// Returns the outcome and the number of subscribers that received it.
    async fn verify_and_publish(
        &self,
        user_id: &str,
        message_id: &MessageId,
        current_body: &str,
    ) -> Result<(VerificationOutcome, usize), VerifyError>;

    /// Publish a `VerificationCompleted` event for an outcome.
    async fn publish_outcome(&self, user_id: &str, outcome: &VerificationOutcome) -> usize;
}

/// Event bus adapter for the verification subsystem.
pub struct EventBusAdapter<S, P>
where
    S: VerificationApi,
    P: EventPublisher + ?Sized,
{
    service: Arc<S>,
    publisher: Arc<P>,
}

impl<S, P> EventBusAdapter<S, P>
where
    S: VerificationApi,
    P: EventPublisher + ?Sized,
{
    pub fn new(service: Arc<S>, publisher: Arc<P>) -> Self {
        Self { service, publisher }
    }

    /// Get a reference to the underlying service.
    pub fn service(&self) -> &S {
        &self.service
    }
}

#[async_trait]
impl<S, P> VerificationBusAdapter for EventBusAdapter<S, P>
where
    S: VerificationApi,
    P: EventPublisher + ?Sized,
{
    async fn verify_and_publish(
        &self,
        user_id: &str,
        message_id: &MessageId,
        current_body: &str,
    ) -> Result<(VerificationOutcome, usize), VerifyError> {
        let outcome = self.service.verify(user_id, message_id, current_body).await?;
        let receivers = self.publish_outcome(user_id, &outcome).await;
        Ok((outcome, receivers))
    }

    async fn publish_outcome(&self, user_id: &str, outcome: &VerificationOutcome) -> usize {
        let receivers = self
            .publisher
            .publish(MailEvent::VerificationCompleted {
                user_id: normalize_address(user_id),
                message_id: outcome.message_id,
                classification: outcome.classification,
                reason: outcome.reason.clone(),
            })
            .await;
        debug!(message_id = %outcome.message_id, receivers, "VerificationCompleted published");
        receivers
    }
}
