//! # Mailbox Watcher
//!
//! Polls the JSON store's files and reports changes this process did not
//! make, e.g. another client sharing the same data directory.
//!
//! ```text
//! tick ──► scan() ──► fingerprint changed? ──► own write? ──no──► MailboxChanged{External}
//! ```

use crate::adapters::json_file::{Fingerprint, JsonFileMessageStore};
use shared_bus::{ChangeOrigin, EventPublisher, MailEvent};
use shared_types::{StoreError, UserId};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

/// Detects out-of-process edits to a `JsonFileMessageStore`.
pub struct MailboxWatcher {
    store: Arc<JsonFileMessageStore>,
    publisher: Arc<dyn EventPublisher>,
    interval: Duration,
    seen: HashMap<PathBuf, Fingerprint>,
}

impl MailboxWatcher {
    /// Create a watcher. Files already present form the baseline and are not
    /// reported.
    pub fn new(
        store: Arc<JsonFileMessageStore>,
        publisher: Arc<dyn EventPublisher>,
        interval: Duration,
    ) -> Result<Self, StoreError> {
        let seen = store.scan()?.into_iter().collect();
        Ok(Self {
            store,
            publisher,
            interval,
            seen,
        })
    }

    /// Compare the directory against the last scan and publish one event per
    /// externally changed mailbox. Returns the affected users.
    pub async fn poll_once(&mut self) -> Result<Vec<UserId>, StoreError> {
        let mut changed = Vec::new();

        for (path, fingerprint) in self.store.scan()? {
            if self.seen.get(&path) == Some(&fingerprint) {
                continue;
            }
            self.seen.insert(path.clone(), fingerprint);

            if self.store.is_own_write(&path, &fingerprint) {
                continue;
            }

            let Some(user_id) = self.store.owner_of(&path)? else {
                continue;
            };
            debug!(user = %user_id, path = %path.display(), "External mailbox change");
            self.publisher
                .publish(MailEvent::MailboxChanged {
                    user_id: user_id.clone(),
                    message_id: None,
                    origin: ChangeOrigin::External,
                })
                .await;
            changed.push(user_id);
        }

        Ok(changed)
    }

    /// Run `poll_once` on the configured interval until the task is aborted.
    pub fn spawn(mut self) -> JoinHandle<()> {
        info!(interval_ms = self.interval.as_millis() as u64, "Mailbox watcher started");
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut ticks = IntervalStream::new(interval);

            while ticks.next().await.is_some() {
                if let Err(e) = self.poll_once().await {
                    warn!(error = %e, "Mailbox watcher scan failed");
                }
            }
        })
    }
}
