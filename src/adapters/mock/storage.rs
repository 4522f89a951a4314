//! In-memory key-value store for testing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{KeyValueStore, StorageError};

/// In-memory key-value store for testing.
///
/// Clones share the same map, so a test can keep one handle for inspection
/// while the code under test owns another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    /// Stored values
    values: Arc<Mutex<HashMap<String, String>>>,
    /// Whether writes should fail
    write_should_fail: Arc<Mutex<bool>>,
    /// Whether reads should fail
    read_should_fail: Arc<Mutex<bool>>,
    /// Key whose writes fail while every other key succeeds
    failing_key: Arc<Mutex<Option<String>>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with initial entries.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        {
            let mut values = store.values.lock().unwrap();
            for (key, value) in entries {
                values.insert(key.to_string(), value.to_string());
            }
        }
        store
    }

    /// Configure whether set/remove should fail.
    pub fn set_write_should_fail(&self, should_fail: bool) {
        *self.write_should_fail.lock().unwrap() = should_fail;
    }

    /// Make set/remove fail for one key only, or clear with `None`.
    pub fn set_write_should_fail_for(&self, key: Option<&str>) {
        *self.failing_key.lock().unwrap() = key.map(str::to_string);
    }

    fn write_fails(&self, key: &str) -> bool {
        *self.write_should_fail.lock().unwrap()
            || self.failing_key.lock().unwrap().as_deref() == Some(key)
    }

    /// Configure whether get should fail.
    pub fn set_read_should_fail(&self, should_fail: bool) {
        *self.read_should_fail.lock().unwrap() = should_fail;
    }

    /// Read a value synchronously without failure injection.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if *self.read_should_fail.lock().unwrap() {
            return Err(StorageError::ReadFailed("Mock read failure".to_string()));
        }
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.write_fails(key) {
            return Err(StorageError::WriteFailed("Mock write failure".to_string()));
        }
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.write_fails(key) {
            return Err(StorageError::WriteFailed("Mock write failure".to_string()));
        }
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}
