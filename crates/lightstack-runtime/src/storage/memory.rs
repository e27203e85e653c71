//! In-memory storage backend.

use super::{DurableStorage, StorageError};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Process-local [`DurableStorage`].
///
/// Used in tests and by hosts that provide their own persistence at a
/// higher level. Values do not survive a restart.
///
/// # Example
///
/// ```
/// use lightstack_runtime::storage::{DurableStorage, MemoryStorage};
///
/// let storage = MemoryStorage::new();
/// storage.set("token", "\"abc\"").unwrap();
/// assert_eq!(storage.get("token").unwrap().as_deref(), Some("\"abc\""));
///
/// storage.remove("token").unwrap();
/// assert_eq!(storage.get("token").unwrap(), None);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl DurableStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_value() {
        let storage = MemoryStorage::new();
        storage.set("k", "1").unwrap();
        storage.set("k", "2").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("2"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn remove_missing_is_ok() {
        let storage = MemoryStorage::new();
        assert!(storage.remove("missing").is_ok());
        assert!(storage.is_empty());
    }
}
