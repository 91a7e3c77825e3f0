// SPDX-License-Identifier: MPL-2.0
//! File-backed key-value store using CBOR format.
//!
//! Every key lives in a single `storage.cbor` file inside the data
//! directory. The file is read on every `get` and rewritten in full on every
//! `set`, which suits the small, rarely written seen-set.
//!
//! # Path Resolution
//!
//! 1. `open(Some(dir))` with an explicit directory
//! 2. `BANNER_ENGINE_DATA_DIR` environment variable
//! 3. Platform-specific data directory

use super::KeyValueStorage;
use crate::error::StorageError;
use crate::paths;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

/// Storage file name within the data directory.
const STORAGE_FILE: &str = "storage.cbor";

type Entries = BTreeMap<String, String>;

/// Key-value store persisted to a CBOR file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Opens the store in `base_dir`, or in the resolved data directory.
    ///
    /// The file itself is created lazily on the first `set`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if no data directory can be
    /// determined.
    pub fn open(base_dir: Option<PathBuf>) -> Result<Self, StorageError> {
        let dir = paths::get_data_dir_with_override(base_dir).ok_or(StorageError::Unavailable)?;
        Ok(Self::at_path(dir.join(STORAGE_FILE)))
    }

    /// Uses `path` as the storage file.
    #[must_use]
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Entries, StorageError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(err) => return Err(StorageError::Read(err.to_string())),
        };

        ciborium::from_reader(BufReader::new(file)).map_err(|err| match err {
            // A truncated file surfaces as an early EOF.
            ciborium::de::Error::Io(io) if io.kind() == ErrorKind::UnexpectedEof => {
                StorageError::Corrupt(io.to_string())
            }
            ciborium::de::Error::Io(io) => StorageError::Read(io.to_string()),
            other => StorageError::Corrupt(other.to_string()),
        })
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| StorageError::Write(err.to_string()))?;
        }

        let file =
            fs::File::create(&self.path).map_err(|err| StorageError::Write(err.to_string()))?;
        ciborium::into_writer(entries, BufWriter::new(file))
            .map_err(|err| StorageError::Write(err.to_string()))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();

        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(StorageError::Corrupt(reason)) => {
                tracing::warn!(path = %self.path.display(), %reason, "replacing corrupt storage file");
                Entries::new()
            }
            Err(err) => return Err(err),
        };

        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }
}
