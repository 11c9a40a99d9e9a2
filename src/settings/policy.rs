use crate::env;
use crate::settings::store::{SettingsStore, StoreError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// What the application does with a saved session at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartupBehavior {
    /// Start with no tabs; the saved session is left in place
    Blank,
    /// Reopen the tabs of the previous session
    #[default]
    Restore,
}

/// Unrecognised startup policy value
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown startup behavior '{0}' (expected 'blank' or 'restore')")]
pub struct ParseStartupBehaviorError(pub String);

impl StartupBehavior {
    pub fn as_str(self) -> &'static str {
        match self {
            StartupBehavior::Blank => env::settings::STARTUP_BLANK,
            StartupBehavior::Restore => env::settings::STARTUP_RESTORE,
        }
    }

    /// Interpret a stored setting. Absent or unknown values fall back to the default.
    pub fn from_setting(value: Option<&str>) -> Self {
        match value {
            None => Self::default(),
            Some(raw) => raw.parse().unwrap_or_else(|e: ParseStartupBehaviorError| {
                warn!("{}; using '{}'", e, Self::default());
                Self::default()
            }),
        }
    }

    /// Read the policy stored under `key`
    pub fn load(store: &dyn SettingsStore, key: &str) -> Result<Self, StoreError> {
        Ok(Self::from_setting(store.get(key)?.as_deref()))
    }

    /// Persist the policy under `key`
    pub fn save(self, store: &dyn SettingsStore, key: &str) -> Result<(), StoreError> {
        store.set(key, self.as_str())
    }
}

impl fmt::Display for StartupBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StartupBehavior {
    type Err = ParseStartupBehaviorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            env::settings::STARTUP_BLANK => Ok(StartupBehavior::Blank),
            env::settings::STARTUP_RESTORE => Ok(StartupBehavior::Restore),
            other => Err(ParseStartupBehaviorError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemorySettingsStore;

    #[test]
    fn test_default_is_restore() {
        assert_eq!(StartupBehavior::default(), StartupBehavior::Restore);
        assert_eq!(StartupBehavior::from_setting(None), StartupBehavior::Restore);
    }

    #[test]
    fn test_parse_values() {
        assert_eq!("blank".parse::<StartupBehavior>().unwrap(), StartupBehavior::Blank);
        assert_eq!(
            "restore".parse::<StartupBehavior>().unwrap(),
            StartupBehavior::Restore
        );
        assert!("sometimes".parse::<StartupBehavior>().is_err());
        assert_eq!(
            StartupBehavior::from_setting(Some("sometimes")),
            StartupBehavior::Restore
        );
    }

    #[test]
    fn test_load_and_save() {
        let store = MemorySettingsStore::new();
        let key = env::settings::STARTUP_BEHAVIOR_KEY;

        assert_eq!(StartupBehavior::load(&store, key).unwrap(), StartupBehavior::Restore);

        StartupBehavior::Blank.save(&store, key).unwrap();
        assert_eq!(store.get(key).unwrap().as_deref(), Some("blank"));
        assert_eq!(StartupBehavior::load(&store, key).unwrap(), StartupBehavior::Blank);
    }
}
