//! Key-value storage trait abstraction.
//!
//! The session is persisted as plain strings under fixed keys, so any
//! store that can get, set and remove a string will do.

/// Storage operation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// Failed to read the backing store
    ReadFailed(String),
    /// Failed to write the backing store
    WriteFailed(String),
    /// Backing data could not be (de)serialised
    Serialization(String),
    /// Other error
    Other(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::ReadFailed(msg) => write!(f, "Failed to read storage: {}", msg),
            StorageError::WriteFailed(msg) => write!(f, "Failed to write storage: {}", msg),
            StorageError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            StorageError::Other(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// Trait for persistent string storage.
///
/// Implementations include the production file-backed store and an
/// in-memory store for tests.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `Ok(None)` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
