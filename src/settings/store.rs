use dashmap::DashMap;
use std::sync::Arc;

/// Errors raised by a settings backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file does not hold a JSON object of strings
    #[error("Settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A writer panicked while holding the settings lock
    #[error("Settings lock poisoned")]
    Poisoned,
}

/// Process-wide key to string mapping used as the persistence medium.
///
/// Every write replaces the whole value stored under a key; there is no
/// read-modify-write API, so the last writer wins.
pub trait SettingsStore: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Whether a value is stored under `key`
    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

impl<T: SettingsStore + ?Sized> SettingsStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// In-memory settings store, used by tests and by embedders that keep
/// settings elsewhere
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: DashMap<String, String>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).map(|value| value.clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_get_set_remove() {
        let store = MemorySettingsStore::new();
        assert_eq!(store.get("missing").unwrap(), None);

        store.set("key", "first").unwrap();
        store.set("key", "second").unwrap();
        assert_eq!(store.get("key").unwrap().as_deref(), Some("second"));
        assert!(store.contains("key").unwrap());

        store.remove("key").unwrap();
        assert!(!store.contains("key").unwrap());

        // Removing twice is fine
        store.remove("key").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_shared_store_through_arc() {
        let store = Arc::new(MemorySettingsStore::new());
        let handle = store.clone();

        handle.set("shared", "value").unwrap();
        assert_eq!(store.get("shared").unwrap().as_deref(), Some("value"));
        assert_eq!(store.len(), 1);
    }
}
