//! File-backed key-value store adapter.
//!
//! Stores all keys in one JSON object at `~/.edu-client/session.json`.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use crate::traits::{KeyValueStore, StorageError};

/// The storage directory name.
const STORE_DIR: &str = ".edu-client";

/// The storage file name.
const STORE_FILE: &str = "session.json";

/// File-backed key-value store.
///
/// Every write rewrites the whole file; the embedded lock serialises writers
/// within the process.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Create a store at the default location under the home directory.
    pub fn new() -> Result<Self, StorageError> {
        let home = dirs::home_dir()
            .ok_or_else(|| StorageError::Other("Failed to determine home directory".to_string()))?;
        Ok(Self::at_path(home.join(STORE_DIR).join(STORE_FILE)))
    }

    /// Create a store backed by the given file.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Get the path to the storage file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let file = File::open(&self.path)
            .map_err(|e| StorageError::ReadFailed(format!("{}: {}", self.path.display(), e)))?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Read the map ahead of a write. An unparseable file is replaced on the
    /// next write; the flag reports whether that happened.
    fn read_map_for_write(&self) -> Result<(BTreeMap<String, String>, bool), StorageError> {
        match self.read_map() {
            Ok(map) => Ok((map, false)),
            Err(StorageError::Serialization(e)) => {
                warn!("Discarding unreadable store {}: {}", self.path.display(), e);
                Ok((BTreeMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StorageError::WriteFailed(format!("{}: {}", parent.display(), e)))?;
        }

        let file = File::create(&self.path)
            .map_err(|e| StorageError::WriteFailed(format!("{}: {}", self.path.display(), e)))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, map)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| StorageError::WriteFailed(e.to_string()))
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.guard();
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.guard();
        let (mut map, _) = self.read_map_for_write()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.guard();
        let (mut map, discarded) = self.read_map_for_write()?;
        if map.remove(key).is_none() && !discarded {
            return Ok(());
        }
        self.write_map(&map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store(temp_dir: &TempDir) -> FileKeyValueStore {
        FileKeyValueStore::at_path(temp_dir.path().join(STORE_DIR).join(STORE_FILE))
    }

    #[test]
    fn test_get_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);
        assert_eq!(store.get("edu_token").unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_set_creates_directory_and_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        store.set("edu_token", "abc").unwrap();

        assert!(store.path().exists());
        assert_eq!(store.get("edu_token").unwrap(), Some("abc".to_string()));
    }

    #[test]
    fn test_set_overwrites_and_keeps_other_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        store.set("edu_token", "one").unwrap();
        store.set("edu_user", r#"{"id":"user_1","role":"student"}"#).unwrap();
        store.set("edu_token", "two").unwrap();

        assert_eq!(store.get("edu_token").unwrap(), Some("two".to_string()));
        assert_eq!(
            store.get("edu_user").unwrap(),
            Some(r#"{"id":"user_1","role":"student"}"#.to_string())
        );
    }

    #[test]
    fn test_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        store.set("edu_token", "abc").unwrap();
        store.remove("edu_token").unwrap();
        assert_eq!(store.get("edu_token").unwrap(), None);

        // Removing again, or from a missing file, is fine
        store.remove("edu_token").unwrap();
        let other = FileKeyValueStore::at_path(temp_dir.path().join("missing.json"));
        other.remove("edu_token").unwrap();
    }

    #[test]
    fn test_corrupt_file_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let store = FileKeyValueStore::at_path(&path);
        assert!(matches!(
            store.get("edu_token"),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn test_write_replaces_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let store = FileKeyValueStore::at_path(&path);
        store.set("edu_token", "abc").unwrap();
        assert_eq!(store.get("edu_token").unwrap(), Some("abc".to_string()));
    }

    #[test]
    fn test_remove_replaces_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        fs::write(&path, "{ truncated").unwrap();

        let store = FileKeyValueStore::at_path(&path);
        store.remove("edu_token").unwrap();
        assert_eq!(store.get("edu_token").unwrap(), None);
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "{}");
    }

    #[test]
    fn test_values_survive_new_instance() {
        let temp_dir = TempDir::new().unwrap();
        create_test_store(&temp_dir).set("edu_token", "persisted").unwrap();

        let reopened = create_test_store(&temp_dir);
        assert_eq!(reopened.get("edu_token").unwrap(), Some("persisted".to_string()));
    }
}
