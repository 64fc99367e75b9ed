//! History Storage
//!
//! Durable key-value storage the history collection is kept in.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use fs2::FileExt;
use rustc_hash::FxHashMap;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// A stored value could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// A key could not be locked for writing.
    #[error("failed to lock {}: {source}", .path.display())]
    Lock {
        /// Lock file that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// A value could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },
}

/// String values stored under string keys.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the value exists but can't be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// Readers see either the old or the new value, never a partial write.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the value can't be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Take exclusive hold of `key` until the returned lock is dropped.
    ///
    /// Writers that read, change and write a value back hold this lock across
    /// all three steps so concurrent writers can't lose each other's updates.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the lock can't be taken.
    fn lock(&self, key: &str) -> Result<StoreLock, StorageError>;
}

/// Exclusive hold on a stored key, released when dropped.
#[derive(Debug, Default)]
#[must_use = "the key is unlocked as soon as the lock is dropped"]
pub struct StoreLock {
    file: Option<File>,
}

impl StoreLock {
    /// A lock for stores with a single owner, which need no locking.
    pub fn uncontended() -> Self {
        Self::default()
    }

    /// Whether this lock holds an operating-system file lock.
    pub fn is_file_lock(&self) -> bool {
        self.file.is_some()
    }
}

/// Stores each key as a JSON file in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the stored files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File a key is stored in.
    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Lock file guarding writes to a key.
    pub fn lock_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.lock"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path(key);

        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path(key);
        let write_error = |source| StorageError::Write {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(write_error)?;

        // Written beside the target so the rename stays on one filesystem.
        let mut file = NamedTempFile::new_in(&self.dir).map_err(write_error)?;
        file.write_all(value.as_bytes()).map_err(write_error)?;
        file.as_file().sync_all().map_err(write_error)?;

        file.persist(&path)
            .map_err(|persist| write_error(persist.error))?;

        Ok(())
    }

    fn lock(&self, key: &str) -> Result<StoreLock, StorageError> {
        let path = self.lock_path(key);
        let lock_error = |source| StorageError::Lock {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(lock_error)?;

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(lock_error)?;

        // Blocks until other writers release the key; closing the file unlocks it.
        FileExt::lock_exclusive(&file).map_err(lock_error)?;

        Ok(StoreLock { file: Some(file) })
    }
}

/// Keeps values in memory for the life of the store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: FxHashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn lock(&self, _key: &str) -> Result<StoreLock, StorageError> {
        // Writes need `&mut self`, so the borrow checker already serialises them.
        Ok(StoreLock::uncontended())
    }
}
