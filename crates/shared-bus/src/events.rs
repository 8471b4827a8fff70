//! # Mail Events
//!
//! Defines all event types that flow through the shared bus.

use serde::{Deserialize, Serialize};
use shared_types::{Classification, MessageId, UserId};

/// Where a mailbox change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeOrigin {
    /// Written by this process.
    Local,
    /// Observed in the backing storage, written elsewhere ("another device").
    External,
}

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MailEvent {
    // =========================================================================
    // SUBSYSTEM 2: IDENTITY DIRECTORY
    // =========================================================================
    /// A new signer key was bound to an owner.
    IdentityRegistered {
        owner_identifier: String,
        signer_key: String,
    },

    // =========================================================================
    // SUBSYSTEM 3: MESSAGE STORE
    // =========================================================================
    /// A user's mailbox was written.
    MailboxChanged {
        user_id: UserId,
        /// The message touched, when the change is attributable to one.
        message_id: Option<MessageId>,
        origin: ChangeOrigin,
    },

    // =========================================================================
    // RUNTIME: COMPOSER
    // =========================================================================
    /// A message was composed and stored.
    MessageSent {
        message_id: MessageId,
        sender: String,
        recipient: String,
        /// Whether stamp material was attached.
        stamped: bool,
    },

    // =========================================================================
    // SUBSYSTEM 4: VERIFICATION
    // =========================================================================
    /// A verification attempt reached a terminal classification.
    VerificationCompleted {
        user_id: UserId,
        message_id: MessageId,
        classification: Classification,
        reason: String,
    },
}

impl MailEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::IdentityRegistered { .. } => EventTopic::Directory,
            Self::MailboxChanged { .. } => EventTopic::Mailbox,
            Self::MessageSent { .. } => EventTopic::Composer,
            Self::VerificationCompleted { .. } => EventTopic::Verification,
        }
    }

    /// Get the originating subsystem ID (0 is the runtime itself).
    #[must_use]
    pub fn source_subsystem(&self) -> u8 {
        match self {
            Self::IdentityRegistered { .. } => 2,
            Self::MailboxChanged { .. } => 3,
            Self::MessageSent { .. } => 0,
            Self::VerificationCompleted { .. } => 4,
        }
    }

    /// The user a mailbox-scoped event belongs to.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::MailboxChanged { user_id, .. } | Self::VerificationCompleted { user_id, .. } => {
                Some(user_id)
            }
            _ => None,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Subsystem 2 events.
    Directory,
    /// Subsystem 3 events.
    Mailbox,
    /// Runtime composer events.
    Composer,
    /// Subsystem 4 events.
    Verification,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Restrict mailbox-scoped events to one user. `None` means every user.
    pub user_id: Option<UserId>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            user_id: None,
        }
    }

    /// Narrow the filter to a single user's mailbox events.
    #[must_use]
    pub fn for_user(mut self, user_id: impl Into<UserId>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &MailEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let user_match = match (&self.user_id, event.user_id()) {
            (Some(wanted), Some(actual)) => wanted == actual,
            _ => true,
        };

        topic_match && user_match
    }
}
