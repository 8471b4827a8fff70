//! # Subsystem Construction
//!
//! Builds the directory stack from configuration:
//!
//! ```text
//! PublishingDirectory ──► LatencyDirectory (if latency > 0) ──► InMemoryDirectory (seeded)
//! ```

use super::config::DirectoryConfig;
use shared_bus::EventPublisher;
use std::sync::Arc;
use tracing::info;
use ts_02_identity_directory::{
    IdentityDirectory, InMemoryDirectory, LatencyDirectory, PublishingDirectory, RegistrationError,
};
use ts_03_message_store::MessageStore;

/// Directory handle shared by the composer and the verifier.
pub type SharedDirectory = Arc<dyn IdentityDirectory>;

/// Store handle shared by the composer, the verifier and listings.
pub type SharedStore = Arc<dyn MessageStore>;

/// Seeded in-memory directory, delayed by the configured latency.
pub fn build_directory(config: &DirectoryConfig) -> Result<SharedDirectory, RegistrationError> {
    let seeded = InMemoryDirectory::seeded(
        config
            .seed_identities
            .iter()
            .map(|(owner, key)| (owner.as_str(), key.as_str())),
    )?;
    info!(
        seeded = seeded.len(),
        latency_ms = config.lookup_latency_ms,
        "Identity directory initialized"
    );

    if config.lookup_latency_ms == 0 {
        return Ok(Arc::new(seeded));
    }
    Ok(Arc::new(LatencyDirectory::new(seeded, config.lookup_latency())))
}

/// Announce registrations made through `directory` on the bus.
pub fn with_publishing(
    directory: SharedDirectory,
    publisher: Arc<dyn EventPublisher>,
) -> SharedDirectory {
    Arc::new(PublishingDirectory::new(directory, publisher))
}
