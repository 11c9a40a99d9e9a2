use crate::settings::store::{SettingsStore, StoreError};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, info};

/// Settings store backed by a single JSON object on disk.
///
/// The whole map is kept in memory. Every write serializes the map to a
/// temporary sibling file and renames it over the target, so readers never
/// see a half-written file.
#[derive(Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl FileSettingsStore {
    /// Open the settings file at `path`. A missing file is an empty store;
    /// the file and its parent directory are created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let values = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            debug!("Settings file {} does not exist yet", path.display());
            BTreeMap::new()
        };

        info!(
            "Opened settings file {} ({} keys)",
            path.display(),
            values.len()
        );

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the map to disk, committing via rename
    fn flush(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "settings".to_string());
        let temp_path = self
            .path
            .with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

        let serialized = serde_json::to_vec_pretty(values)?;
        let write_result = (|| -> Result<(), StoreError> {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(&serialized)?;
            file.sync_all()?;
            fs::rename(&temp_path, &self.path)?;
            Ok(())
        })();

        if write_result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }

        write_result
    }

    /// Apply `change` to a copy of the map and commit it only once it is on disk
    fn update(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StoreError> {
        let mut values = self.values.write().map_err(|_| StoreError::Poisoned)?;
        let mut next = values.clone();
        change(&mut next);
        self.flush(&next)?;
        *values = next;
        Ok(())
    }
}

impl SettingsStore for FileSettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.read().map_err(|_| StoreError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|values| {
            values.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        if !self.contains(key)? {
            return Ok(());
        }
        self.update(|values| {
            values.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::open(temp_dir.path().join("nested/settings.json")).unwrap();

        assert_eq!(store.get("anything").unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested/settings.json");

        {
            let store = FileSettingsStore::open(&path).unwrap();
            store.set("startup-behavior", "blank").unwrap();
            store.set("session_state", "{\"tabs\":[]}").unwrap();
            store.remove("session_state").unwrap();
        }

        let reopened = FileSettingsStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("startup-behavior").unwrap().as_deref(),
            Some("blank")
        );
        assert_eq!(reopened.get("session_state").unwrap(), None);

        // Only the settings file is left behind, no temp files
        let entries: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .flatten()
            .collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_corrupt_file_is_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        let result = FileSettingsStore::open(&path);
        assert!(matches!(result, Err(StoreError::Json(_))));
    }
}
