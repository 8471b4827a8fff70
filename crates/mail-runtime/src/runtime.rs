//! # Mail Runtime
//!
//! The in-process façade a mail client talks to. Owns the event bus, the
//! identity directory, the message store, the verifier and the notion of a
//! signed-in user.
//!
//! ```text
//! send_message ──► Composer ──► MessageStore (sender + recipient copies)
//! open_message ──► VerificationTracker.select ──► auto-verify if Unclassified
//! verify_message ──► Verifier ──► classification write-back + VerificationCompleted
//! ```

use crate::composer::{Composer, MessageReceipt, SendRequest};
use crate::container::{build_directory, with_publishing, RuntimeConfig, SharedDirectory, SharedStore};
use crate::errors::{MailboxError, RuntimeError, SendError};
use parking_lot::RwLock;
use shared_bus::{EventFilter, EventPublisher, InMemoryEventBus, Subscription};
use shared_types::{
    normalize_address, Classification, IdentityRecord, MessageId, MessageRecord,
    OwnerIdentifier, RegistrationReceipt, UserId,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use ts_02_identity_directory::{DirectoryError, RegistrationError};
use ts_03_message_store::{
    InMemoryMessageStore, JsonFileMessageStore, MailboxWatcher, StoreNotifier,
};
use ts_04_verification::{
    EventBusAdapter, VerificationApi, VerificationBusAdapter, VerificationOutcome,
    VerificationService, VerificationTracker, VerifyError,
};

type Verifier = EventBusAdapter<VerificationService<SharedDirectory, SharedStore>, dyn EventPublisher>;

/// A message as presented to its reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedMessage {
    /// The stored copy, including its current classification.
    pub record: MessageRecord,
    /// Body the reader should see now.
    pub visible_body: String,
    /// Outcome of the automatic verification, when one ran and is still current.
    pub verification: Option<VerificationOutcome>,
}

/// The main mail runtime orchestrating all subsystems.
pub struct MailRuntime {
    config: RuntimeConfig,
    bus: Arc<InMemoryEventBus>,
    directory: SharedDirectory,
    store: SharedStore,
    composer: Composer<SharedDirectory, SharedStore>,
    verifier: Verifier,
    tracker: VerificationTracker,
    current_user: RwLock<Option<UserId>>,
    file_store: Option<Arc<JsonFileMessageStore>>,
}

impl MailRuntime {
    /// Runtime over an in-memory store.
    pub fn in_memory(config: RuntimeConfig) -> Result<Self, RuntimeError> {
        let directory = build_directory(&config.directory)?;
        Self::assemble(config, directory, Arc::new(InMemoryMessageStore::new()), None)
    }

    /// Runtime over the JSON file store in `config.storage.data_dir`.
    pub fn with_file_store(config: RuntimeConfig) -> Result<Self, RuntimeError> {
        let directory = build_directory(&config.directory)?;
        let file_store = Arc::new(JsonFileMessageStore::open(&config.storage.data_dir)?);
        Self::assemble(config, directory, file_store.clone(), Some(file_store))
    }

    /// Runtime over caller-supplied subsystems.
    pub fn with_parts(
        config: RuntimeConfig,
        directory: SharedDirectory,
        store: SharedStore,
    ) -> Result<Self, RuntimeError> {
        Self::assemble(config, directory, store, None)
    }

    fn assemble(
        config: RuntimeConfig,
        directory: SharedDirectory,
        store: SharedStore,
        file_store: Option<Arc<JsonFileMessageStore>>,
    ) -> Result<Self, RuntimeError> {
        config.validate()?;
        info!("Creating mail runtime");

        let bus = Arc::new(InMemoryEventBus::with_capacity(config.storage.bus_capacity));
        let publisher: Arc<dyn EventPublisher> = bus.clone();

        let directory = with_publishing(directory, publisher.clone());
        let store: SharedStore = Arc::new(StoreNotifier::new(store, bus.clone()));

        let composer = Composer::new(directory.clone(), store.clone(), publisher.clone());
        let service = VerificationService::with_config(
            directory.clone(),
            store.clone(),
            config.verifier_config(),
        );
        let verifier = EventBusAdapter::new(Arc::new(service), publisher);

        Ok(Self {
            config,
            bus,
            directory,
            store,
            composer,
            verifier,
            tracker: VerificationTracker::new(),
            current_user: RwLock::new(None),
            file_store,
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    // =========================================================================
    // SESSION
    // =========================================================================

    /// Make `user_id` the current user.
    pub fn sign_in(&self, user_id: &str) {
        let user = normalize_address(user_id);
        info!(user = %user, "Signed in");
        *self.current_user.write() = Some(user);
        self.tracker.clear();
    }

    pub fn sign_out(&self) {
        *self.current_user.write() = None;
        self.tracker.clear();
    }

    pub fn current_user(&self) -> Option<UserId> {
        self.current_user.read().clone()
    }

    // =========================================================================
    // IDENTITY
    // =========================================================================

    pub async fn register(
        &self,
        owner: &str,
        signer_key: &str,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        self.directory.register(owner, signer_key).await
    }

    pub async fn lookup_identity(&self, signer_key: &str) -> Result<OwnerIdentifier, DirectoryError> {
        self.directory.lookup(signer_key).await
    }

    /// Identity matching an owner address or a signer key.
    pub async fn query_identity(&self, text: &str) -> Result<IdentityRecord, DirectoryError> {
        self.directory.query(text).await
    }

    pub async fn registered_identities(&self) -> Result<Vec<IdentityRecord>, DirectoryError> {
        self.directory.list_all().await
    }

    // =========================================================================
    // MAIL
    // =========================================================================

    /// Send a message. An empty `from` sends as the current user.
    pub async fn send_message(&self, request: SendRequest) -> Result<MessageReceipt, SendError> {
        let sender = if request.from.trim().is_empty() {
            self.current_user().ok_or(SendError::NoActiveUser)?
        } else {
            request.from.clone()
        };
        let (_, receipt) = self.composer.send(&sender, request).await?;
        Ok(receipt)
    }

    /// Current user's received messages, newest first.
    pub fn inbox(&self) -> Result<Vec<MessageRecord>, MailboxError> {
        let user = self.current_user().ok_or(MailboxError::NoActiveUser)?;
        Ok(self.store.list_inbound(&user)?)
    }

    /// Current user's sent messages, newest first.
    pub fn sent(&self) -> Result<Vec<MessageRecord>, MailboxError> {
        let user = self.current_user().ok_or(MailboxError::NoActiveUser)?;
        Ok(self.store.list_sent(&user)?)
    }

    /// One of the current user's messages, from either folder.
    pub fn message(&self, message_id: &MessageId) -> Result<MessageRecord, MailboxError> {
        let user = self.current_user().ok_or(MailboxError::NoActiveUser)?;
        Ok(self.store.get(&user, message_id)?)
    }

    /// Verify the current user's copy of `message_id` against `current_body`.
    ///
    /// Always returns the outcome; use `verify_selected` when only a result
    /// for the message on screen should be kept.
    pub async fn verify_message(
        &self,
        message_id: &MessageId,
        current_body: &str,
    ) -> Result<VerificationOutcome, VerifyError> {
        let user = self.current_user().ok_or(VerifyError::NoActiveUser)?;
        let (outcome, _) = self
            .verifier
            .verify_and_publish(&user, message_id, current_body)
            .await?;
        Ok(outcome)
    }

    /// Verify and keep the outcome only if `message_id` is still selected and
    /// no newer attempt started meanwhile.
    pub async fn verify_selected(
        &self,
        message_id: &MessageId,
        current_body: &str,
    ) -> Result<Option<VerificationOutcome>, VerifyError> {
        let ticket = self.tracker.begin(*message_id);
        let outcome = self.verify_message(message_id, current_body).await?;
        let accepted = self.tracker.accept(ticket, outcome);
        if accepted.is_none() {
            debug!(message_id = %message_id, "Discarding stale verification result");
        }
        Ok(accepted)
    }

    /// Select a message for reading, verifying it first if it never was.
    pub async fn open_message(&self, message_id: &MessageId) -> Result<OpenedMessage, VerifyError> {
        let user = self.current_user().ok_or(VerifyError::NoActiveUser)?;
        self.tracker.select(*message_id);

        let record = self.store.get(&user, message_id)?;
        let verification = if record.classification == Classification::Unclassified {
            self.verify_selected(message_id, &record.original_body).await?
        } else {
            None
        };

        let record = self.store.get(&user, message_id)?;
        Ok(OpenedMessage {
            visible_body: record.visible_body().to_string(),
            record,
            verification,
        })
    }

    /// Judge a record without storing or publishing anything.
    pub async fn preview_verification(
        &self,
        record: &MessageRecord,
        current_body: &str,
    ) -> VerificationOutcome {
        self.verifier.service().evaluate(record, current_body).await
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        self.bus.subscribe(filter)
    }

    /// Start polling the file store for external edits. `None` when the
    /// runtime is not file-backed.
    pub fn start_watcher(&self) -> Result<Option<JoinHandle<()>>, RuntimeError> {
        let Some(file_store) = &self.file_store else {
            return Ok(None);
        };
        let watcher = MailboxWatcher::new(
            file_store.clone(),
            self.bus.clone(),
            self.config.storage.watch_interval(),
        )?;
        Ok(Some(watcher.spawn()))
    }
}
