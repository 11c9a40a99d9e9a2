//! Configuration discovery and loading
//!
//! This module handles the configuration discovery hierarchy:
//! 1. Current directory: ./tabsession.toml or ./.tabsession/config.toml
//! 2. User config: ~/.tabsession/config.toml
//! 3. System config: /etc/tabsession/config.toml
//! 4. Built-in defaults

use crate::{WorkbenchConfig, env};
use anyhow::{Context, Result};
use std::env as std_env;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Configuration discovery system
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Load `override_path` if given, otherwise the first file in the hierarchy
    pub fn load(override_path: Option<&PathBuf>) -> Result<WorkbenchConfig> {
        if let Some(path) = override_path {
            info!("Loading configuration override from: {:?}", path);
            return WorkbenchConfig::from_toml_file(path)
                .with_context(|| format!("Invalid configuration file {:?}", path));
        }
        Self::discover_config()
    }

    /// Discover and load configuration using the hierarchy
    pub fn discover_config() -> Result<WorkbenchConfig> {
        if let Some(config_path) = Self::find_config_file() {
            info!("Loading configuration from: {:?}", config_path);
            return WorkbenchConfig::from_toml_file(&config_path)
                .with_context(|| format!("Invalid configuration file {:?}", config_path));
        }

        info!("No configuration file found, using defaults");
        Ok(WorkbenchConfig::default())
    }

    /// Find configuration file using discovery hierarchy
    pub fn find_config_file() -> Option<PathBuf> {
        for candidate in Self::get_config_candidates() {
            debug!("Checking for config file: {:?}", candidate);
            if candidate.is_file() {
                debug!("Found config file: {:?}", candidate);
                return Some(candidate);
            }
        }

        debug!("No config file found in discovery hierarchy");
        None
    }

    /// Get list of configuration file candidates in priority order
    fn get_config_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Ok(current_dir) = std_env::current_dir() {
            candidates.push(current_dir.join(env::LOCAL_CONFIG_FILE_NAME));
            candidates.push(env::local_config_file_path(&current_dir));
        }

        if let Some(home_dir) = Self::get_home_dir() {
            candidates.push(env::user_config_file_path(&home_dir));
        }

        #[cfg(unix)]
        candidates.push(PathBuf::from("/etc/tabsession").join(env::CONFIG_FILE_NAME));

        #[cfg(windows)]
        if let Ok(program_data) = std_env::var("PROGRAMDATA") {
            candidates.push(
                PathBuf::from(program_data)
                    .join("tabsession")
                    .join(env::CONFIG_FILE_NAME),
            );
        }

        candidates
    }

    /// Get home directory path
    pub fn get_home_dir() -> Option<PathBuf> {
        std_env::var("HOME")
            .ok()
            .or_else(|| std_env::var("USERPROFILE").ok())
            .map(PathBuf::from)
    }

    /// Settings file to open: explicit override, then config, then the user default
    pub fn settings_path(config: &WorkbenchConfig, override_path: Option<&PathBuf>) -> PathBuf {
        match override_path {
            Some(path) => path.clone(),
            None => config.resolve_settings_path(Self::get_home_dir().as_deref()),
        }
    }

    /// Create a default config file in the user's home directory
    pub fn create_default_user_config() -> Result<PathBuf> {
        let home_dir = Self::get_home_dir().context("Could not determine home directory")?;

        let config_dir = env::user_config_dir_path(&home_dir);
        let config_path = env::user_config_file_path(&home_dir);

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
            info!("Created configuration directory: {:?}", config_dir);
        }

        if !config_path.exists() {
            WorkbenchConfig::default().to_toml_file(&config_path)?;
            info!("Created default configuration file: {:?}", config_path);
        } else {
            warn!("Configuration file already exists: {:?}", config_path);
        }

        Ok(config_path)
    }

    /// Show configuration discovery information for debugging
    pub fn show_discovery_info() {
        println!("Configuration Discovery Hierarchy:");
        println!();

        for (i, candidate) in Self::get_config_candidates().iter().enumerate() {
            let status = if candidate.exists() {
                if candidate.is_file() {
                    "✓ EXISTS"
                } else {
                    "✗ NOT A FILE"
                }
            } else {
                "✗ NOT FOUND"
            };

            println!("  {}. {:?} - {}", i + 1, candidate, status);
        }

        println!();
        if let Some(found) = Self::find_config_file() {
            println!("Active configuration: {:?}", found);
        } else {
            println!("Active configuration: Built-in defaults");
        }

        if let Some(home_dir) = Self::get_home_dir() {
            println!(
                "Default settings file: {:?}",
                env::user_settings_file_path(&home_dir)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_config_candidates() {
        let candidates = ConfigDiscovery::get_config_candidates();

        assert!(!candidates.is_empty());
        assert_eq!(candidates[0].file_name().unwrap(), "tabsession.toml");
    }

    #[test]
    fn test_load_override() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("custom.toml");
        std::fs::write(&config_path, "autosave_interval_ms = 5000\n").unwrap();

        let config = ConfigDiscovery::load(Some(&config_path)).unwrap();
        assert_eq!(config.autosave_interval_ms, 5000);
        assert!(config.enable_autosave);
    }

    #[test]
    fn test_load_invalid_override() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        std::fs::write(&config_path, "autosave_interval_ms = \"soon\"\n").unwrap();

        assert!(ConfigDiscovery::load(Some(&config_path)).is_err());
    }

    #[test]
    #[serial]
    fn test_settings_path_from_home() {
        let temp_dir = TempDir::new().unwrap();
        let original_home = std_env::var("HOME").ok();
        unsafe { std_env::set_var("HOME", temp_dir.path()) };

        let path = ConfigDiscovery::settings_path(&WorkbenchConfig::default(), None);
        assert_eq!(path, temp_dir.path().join(".tabsession").join("settings.json"));

        let explicit = PathBuf::from("/tmp/explicit.json");
        assert_eq!(
            ConfigDiscovery::settings_path(&WorkbenchConfig::default(), Some(&explicit)),
            explicit
        );

        match original_home {
            Some(home) => unsafe { std_env::set_var("HOME", home) },
            None => unsafe { std_env::remove_var("HOME") },
        }
    }

    #[test]
    #[serial]
    fn test_create_default_user_config() {
        let temp_dir = TempDir::new().unwrap();
        let original_home = std_env::var("HOME").ok();
        unsafe { std_env::set_var("HOME", temp_dir.path()) };

        let path = ConfigDiscovery::create_default_user_config().unwrap();
        assert!(path.is_file());
        let loaded = WorkbenchConfig::from_toml_file(&path).unwrap();
        assert_eq!(loaded, WorkbenchConfig::default());

        match original_home {
            Some(home) => unsafe { std_env::set_var("HOME", home) },
            None => unsafe { std_env::remove_var("HOME") },
        }
    }
}
