//! # JSON File Message Store
//!
//! One JSON document per user under a data directory:
//!
//! ```text
//! <data_dir>/
//!   .mailbox.lock          advisory lock shared by every process
//!   alice_40x.com.json     { "user_id": "alice@x.com", "mailbox": { ... } }
//!   bob_40x.com.json
//! ```
//!
//! File names keep ASCII letters, digits, `.` and `-`; every other byte of the
//! normalized address becomes `_` plus two hex digits, so distinct addresses
//! never share a file. A file whose recorded owner differs from the requested
//! user is rejected.
//!
//! Writes go to a temp file that is renamed over the target, so readers never
//! see a half-written mailbox. Writes are serialized in-process by a mutex
//! and across processes by an exclusive `fs2` lock.

use crate::domain::mailbox::{self, Folder};
use crate::ports::outbound::MessageStore;
use fs2::FileExt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use shared_types::{
    newest_first, normalize_address, Classification, Mailbox, MessageId, MessageRecord, StoreError,
    UserId,
};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};

const LOCK_FILE: &str = ".mailbox.lock";
const EXTENSION: &str = "json";

/// Identity of a file's current contents, as far as metadata can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    pub modified: SystemTime,
    pub len: u64,
}

impl Fingerprint {
    fn of(path: &Path) -> Option<Self> {
        let meta = fs::metadata(path).ok()?;
        Some(Self {
            modified: meta.modified().ok()?,
            len: meta.len(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct MailboxFile {
    user_id: UserId,
    mailbox: Mailbox,
}

/// File-backed implementation of `MessageStore`.
pub struct JsonFileMessageStore {
    dir: PathBuf,
    write_guard: Mutex<()>,
    /// Fingerprint left behind by this process's most recent write, per file.
    own_writes: Mutex<HashMap<PathBuf, Fingerprint>>,
}

impl JsonFileMessageStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| StoreError::Unavailable(format!("{}: {e}", dir.display())))?;
        info!(dir = %dir.display(), "Opened JSON message store");
        Ok(Self {
            dir,
            write_guard: Mutex::new(()),
            own_writes: Mutex::new(HashMap::new()),
        })
    }

    /// Root data directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding `user_id`'s mailbox.
    pub fn path_for(&self, user_id: &str) -> PathBuf {
        let mut stem = String::new();
        for byte in normalize_address(user_id).bytes() {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'-') {
                stem.push(char::from(byte));
            } else {
                stem.push_str(&format!("_{byte:02x}"));
            }
        }
        self.dir.join(format!("{stem}.{EXTENSION}"))
    }

    /// Mailbox files currently present, with their fingerprints.
    pub fn scan(&self) -> Result<Vec<(PathBuf, Fingerprint)>, StoreError> {
        let mut found = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(fp) = Fingerprint::of(&path) {
                found.push((path, fp));
            }
        }
        Ok(found)
    }

    /// Whether `fingerprint` is exactly what this process last wrote to `path`.
    pub fn is_own_write(&self, path: &Path, fingerprint: &Fingerprint) -> bool {
        self.own_writes.lock().get(path) == Some(fingerprint)
    }

    /// Owner recorded inside a mailbox file.
    pub fn owner_of(&self, path: &Path) -> Result<Option<UserId>, StoreError> {
        Ok(Self::read_file(path)?.map(|f| f.user_id))
    }

    fn read_file(path: &Path) -> Result<Option<MailboxFile>, StoreError> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// `user_id` must already be normalized.
    fn load(&self, user_id: &str) -> Result<Mailbox, StoreError> {
        let path = self.path_for(user_id);
        let Some(file) = Self::read_file(&path)? else {
            return Ok(Mailbox::default());
        };
        if normalize_address(&file.user_id) != user_id {
            return Err(StoreError::OwnerMismatch {
                path: path.display().to_string(),
                expected: user_id.to_string(),
                found: file.user_id,
            });
        }
        Ok(file.mailbox)
    }

    fn lock_file(&self) -> Result<File, StoreError> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.dir.join(LOCK_FILE))?;
        file.lock_exclusive()?;
        Ok(file)
    }

    fn persist(&self, user_id: &str, mailbox: Mailbox) -> Result<(), StoreError> {
        let path = self.path_for(user_id);
        let tmp = path.with_extension(format!("{EXTENSION}.tmp"));
        let document = MailboxFile {
            user_id: user_id.to_string(),
            mailbox,
        };
        fs::write(&tmp, serde_json::to_vec_pretty(&document)?)?;
        fs::rename(&tmp, &path)?;

        if let Some(fp) = Fingerprint::of(&path) {
            self.own_writes.lock().insert(path, fp);
        }
        Ok(())
    }

    /// Read-modify-write one user's mailbox under both locks.
    fn modify<T>(
        &self,
        user_id: &str,
        f: impl FnOnce(&mut Mailbox) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let user_id = normalize_address(user_id);
        let _guard = self.write_guard.lock();
        let lock = self.lock_file()?;

        let mut mailbox = self.load(&user_id)?;
        let result = f(&mut mailbox);
        let outcome = match result {
            Ok(value) => self.persist(&user_id, mailbox).map(|()| value),
            Err(e) => Err(e),
        };

        FileExt::unlock(&lock)?;
        outcome
    }

    fn list(&self, user_id: &str, folder: Folder) -> Result<Vec<MessageRecord>, StoreError> {
        let mailbox = self.load(&normalize_address(user_id))?;
        let records = match folder {
            Folder::Sent => mailbox.sent,
            Folder::Received => mailbox.received,
        };
        Ok(newest_first(records))
    }
}

impl MessageStore for JsonFileMessageStore {
    fn save_outbound(&self, user_id: &str, record: MessageRecord) -> Result<(), StoreError> {
        debug!(user = %user_id, message_id = %record.id, "Persisting sent copy");
        self.modify(user_id, |m| {
            mailbox::save(m, Folder::Sent, record);
            Ok(())
        })
    }

    fn save_inbound(&self, user_id: &str, record: MessageRecord) -> Result<(), StoreError> {
        debug!(user = %user_id, message_id = %record.id, "Persisting received copy");
        self.modify(user_id, |m| {
            mailbox::save(m, Folder::Received, record);
            Ok(())
        })
    }

    fn list_inbound(&self, user_id: &str) -> Result<Vec<MessageRecord>, StoreError> {
        self.list(user_id, Folder::Received)
    }

    fn list_sent(&self, user_id: &str) -> Result<Vec<MessageRecord>, StoreError> {
        self.list(user_id, Folder::Sent)
    }

    fn get(&self, user_id: &str, message_id: &MessageId) -> Result<MessageRecord, StoreError> {
        let user_id = normalize_address(user_id);
        mailbox::find(&self.load(&user_id)?, &user_id, message_id)
    }

    fn update_classification(
        &self,
        user_id: &str,
        message_id: &MessageId,
        classification: Classification,
    ) -> Result<MessageRecord, StoreError> {
        let user = normalize_address(user_id);
        self.modify(&user, |m| mailbox::classify(m, &user, message_id, classification))
    }
}
