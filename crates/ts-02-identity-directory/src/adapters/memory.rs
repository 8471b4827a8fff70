//! # In-Memory Directory
//!
//! Process-lifetime directory. One write lock covers the duplicate check and
//! the insert, so two concurrent registrations of the same key cannot both
//! succeed.

use crate::domain::errors::{DirectoryError, RegistrationError};
use crate::domain::validation::validate_registration;
use crate::ports::inbound::IdentityDirectory;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{normalize_address, IdentityRecord, OwnerIdentifier, RegistrationReceipt};
use std::collections::HashMap;
use tracing::{debug, info};

#[derive(Default)]
struct Entries {
    /// signer key -> record
    by_key: HashMap<String, IdentityRecord>,
    /// owner -> signer key
    by_owner: HashMap<String, String>,
}

/// In-memory implementation of `IdentityDirectory`.
pub struct InMemoryDirectory {
    entries: RwLock<Entries>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
        }
    }

    /// Build a directory pre-populated with `(owner, signer_key)` pairs.
    ///
    /// Seeds go through the same validation as `register`.
    pub fn seeded<'a, I>(seeds: I) -> Result<Self, RegistrationError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let directory = Self::new();
        for (owner, key) in seeds {
            directory.insert(owner, key)?;
        }
        Ok(directory)
    }

    /// Number of registered identities.
    pub fn len(&self) -> usize {
        self.entries.read().by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, owner: &str, signer_key: &str) -> Result<RegistrationReceipt, RegistrationError> {
        validate_registration(owner, signer_key)?;
        let record = IdentityRecord::new(owner, signer_key);

        let mut entries = self.entries.write();
        if entries.by_owner.contains_key(&record.owner_identifier) {
            return Err(RegistrationError::AlreadyRegistered {
                value: record.owner_identifier,
            });
        }
        if entries.by_key.contains_key(&record.signer_key) {
            return Err(RegistrationError::AlreadyRegistered {
                value: record.signer_key,
            });
        }

        entries
            .by_owner
            .insert(record.owner_identifier.clone(), record.signer_key.clone());
        entries
            .by_key
            .insert(record.signer_key.clone(), record.clone());

        info!(
            owner = %record.owner_identifier,
            signer_key = %record.signer_key,
            "Identity registered"
        );
        Ok(RegistrationReceipt { record })
    }
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityDirectory for InMemoryDirectory {
    async fn register(
        &self,
        owner: &str,
        signer_key: &str,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        self.insert(owner, signer_key)
    }

    async fn lookup(&self, signer_key: &str) -> Result<OwnerIdentifier, DirectoryError> {
        let key = normalize_address(signer_key);
        let entries = self.entries.read();
        match entries.by_key.get(&key) {
            Some(record) => Ok(record.owner_identifier.clone()),
            None => {
                debug!(signer_key = %key, "Lookup miss");
                Err(DirectoryError::NotFound(key))
            }
        }
    }

    async fn find_by_owner(&self, owner: &str) -> Result<IdentityRecord, DirectoryError> {
        let owner = normalize_address(owner);
        let entries = self.entries.read();
        entries
            .by_owner
            .get(&owner)
            .and_then(|key| entries.by_key.get(key))
            .cloned()
            .ok_or(DirectoryError::NotFound(owner))
    }

    async fn query(&self, text: &str) -> Result<IdentityRecord, DirectoryError> {
        let needle = normalize_address(text);
        let entries = self.entries.read();
        let by_key = entries.by_key.get(&needle);
        let by_owner = || {
            entries
                .by_owner
                .get(&needle)
                .and_then(|key| entries.by_key.get(key))
        };
        by_key
            .or_else(by_owner)
            .cloned()
            .ok_or(DirectoryError::NotFound(needle))
    }

    async fn list_all(&self) -> Result<Vec<IdentityRecord>, DirectoryError> {
        let mut all: Vec<IdentityRecord> = self.entries.read().by_key.values().cloned().collect();
        all.sort_by(|a, b| a.owner_identifier.cmp(&b.owner_identifier));
        Ok(all)
    }
}
