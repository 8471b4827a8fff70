//! # Stale Result Guard
//!
//! A reader can switch messages, or re-verify an edited body, while an
//! earlier verification is still waiting on the directory. Only the latest
//! attempt for the currently selected message may be shown.

use parking_lot::Mutex;
use shared_types::MessageId;

/// Handle identifying one verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationTicket {
    message_id: MessageId,
    attempt: u64,
}

impl VerificationTicket {
    pub fn message_id(&self) -> MessageId {
        self.message_id
    }
}

#[derive(Debug, Default)]
struct TrackerState {
    selected: Option<MessageId>,
    latest_attempt: u64,
}

/// Tracks the selected message and the newest attempt in flight.
#[derive(Debug, Default)]
pub struct VerificationTracker {
    state: Mutex<TrackerState>,
}

impl VerificationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `message_id` as the message being viewed.
    pub fn select(&self, message_id: MessageId) {
        self.state.lock().selected = Some(message_id);
    }

    /// Clear the selection; every in-flight result becomes stale.
    pub fn clear(&self) {
        self.state.lock().selected = None;
    }

    pub fn selected(&self) -> Option<MessageId> {
        self.state.lock().selected
    }

    /// Start an attempt for `message_id`. Supersedes earlier attempts.
    pub fn begin(&self, message_id: MessageId) -> VerificationTicket {
        let mut state = self.state.lock();
        state.latest_attempt += 1;
        VerificationTicket {
            message_id,
            attempt: state.latest_attempt,
        }
    }

    /// Pass `result` through only if `ticket` is still current: its message is
    /// selected and no newer attempt has begun.
    pub fn accept<T>(&self, ticket: VerificationTicket, result: T) -> Option<T> {
        let state = self.state.lock();
        let current = state.selected == Some(ticket.message_id)
            && state.latest_attempt == ticket.attempt;
        current.then_some(result)
    }
}
