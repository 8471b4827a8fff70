//! # Shared Bus - Event Bus for Mailbox Notifications
//!
//! Subsystems publish what happened (an identity was registered, a mailbox
//! changed, a verification finished) and interested parties subscribe.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ Message Store│                    │  Mail Client │
//! │              │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! Publishing never fails: an event with no subscribers is dropped and logged.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{ChangeOrigin, EventFilter, EventTopic, MailEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;
