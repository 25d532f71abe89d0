//! File-backed storage
//!
//! Each key is stored as one file in the storage directory. Every write goes
//! to its own temporary file in the same directory and is renamed into place,
//! so concurrent writers never share a scratch file and a reader only ever
//! sees a complete value.
//!
//! Processes cannot signal each other through the directory, so this backend
//! raises no storage events: tabs on a `FileStorage` converge by polling.

use crate::{ListenerId, LocalStorage, StorageError, StorageListener};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

const VALUE_EXTENSION: &str = "value";

/// Storage persisted as one file per key
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
    next_listener: AtomicU64,
}

impl FileStorage {
    /// Open (and create if needed) a storage directory
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: String::new(),
            source,
        })?;
        log::debug!("Opened file storage at {:?}", dir);
        Ok(Self {
            dir,
            next_listener: AtomicU64::new(0),
        })
    }

    /// Directory backing this storage
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.{}", key, VALUE_EXTENSION)))
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let io_err = |source: std::io::Error| StorageError::Io {
            key: key.to_string(),
            source,
        };

        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{}.", key))
            .suffix(".tmp")
            .tempfile_in(&self.dir)
            .map_err(io_err)?;
        tmp.write_all(value.as_bytes()).map_err(io_err)?;
        tmp.persist(&path).map_err(|e| io_err(e.error))?;
        log::trace!("Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn subscribe(&self, _listener: StorageListener) -> ListenerId {
        log::debug!("File storage raises no change events, tabs rely on polling");
        ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed))
    }

    fn unsubscribe(&self, _id: ListenerId) {}
}
