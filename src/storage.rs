//! Storage
//!
//! A small key-value seam the stores persist through. Values are JSON documents.

use std::{cell::RefCell, fs, io, path::PathBuf};

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Key the cart is persisted under.
pub const CART_STORAGE_KEY: &str = "cart-storage";

/// Key the order history is persisted under.
pub const SALES_STORAGE_KEY: &str = "sales-storage";

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("storage I/O failed for key {key:?}")]
    Io {
        /// Key being accessed
        key: String,

        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// A stored value could not be encoded or decoded.
    #[error("stored value for key {key:?} is not valid")]
    Json {
        /// Key being accessed
        key: String,

        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
}

/// String key-value storage.
pub trait Storage {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Storage that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RefCell<FxHashMap<String, String>>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());

        Ok(())
    }
}

/// Storage backed by one `<key>.json` file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Store files under `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let io_error = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_error)?;
        fs::write(self.path(key), value).map_err(io_error)
    }
}
