//! Durable backends for the two session slots.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Contents of the two named storage slots.
///
/// Both slots are read and written together, so a backend can commit them in
/// one step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slots {
    /// Serialized identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    /// Bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl Slots {
    /// Returns `true` when neither slot holds a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identity.is_none() && self.credential.is_none()
    }
}

/// Backend for the session slots.
///
/// `store` replaces both slots at once; a `None` slot is removed.
pub trait SessionStorage: Send + Sync + fmt::Debug {
    /// Read both slots.
    fn load(&self) -> Result<Slots, StorageError>;

    /// Replace both slots.
    fn store(&self, slots: &Slots) -> Result<(), StorageError>;

    /// Remove everything the backend holds, by whatever means it has left.
    fn purge(&self) -> Result<(), StorageError> {
        self.store(&Slots::default())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process storage. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<Slots>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Slots, StorageError> {
        Ok(lock(&self.slots).clone())
    }

    fn store(&self, slots: &Slots) -> Result<(), StorageError> {
        *lock(&self.slots) = slots.clone();
        Ok(())
    }
}

/// Slots persisted as one JSON document on disk.
///
/// Writes go to a sibling temporary file that is renamed over the target,
/// so readers see either the old pair or the new pair.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Use `path` as the backing file. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Slots, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(Slots::default()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Slots::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, slots: &Slots) -> Result<(), StorageError> {
        let _guard = lock(&self.write_lock);

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let encoded = serde_json::to_vec_pretty(slots)?;
        let temp = self.temp_path();
        fs::write(&temp, encoded)?;
        fs::rename(&temp, &self.path)?;

        tracing::debug!(
            path = %self.path.display(),
            empty = slots.is_empty(),
            "Session slots written"
        );
        Ok(())
    }

    fn purge(&self) -> Result<(), StorageError> {
        let _guard = lock(&self.write_lock);
        for path in [self.temp_path(), self.path.clone()] {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        tracing::debug!(path = %self.path.display(), "Session file removed");
        Ok(())
    }
}
