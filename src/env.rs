//! Environment constants and path utilities for tabsession.
//!
//! This module centralizes the settings keys, timer cadence and file locations used
//! throughout the crate, making them easier to maintain and modify.

use std::path::{Path, PathBuf};

/// Application directory name (hidden directory like .git, .vscode)
pub const APP_DIR_NAME: &str = ".tabsession";

/// Configuration file name inside the application directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Stand-alone configuration file name looked up in the current directory
pub const LOCAL_CONFIG_FILE_NAME: &str = "tabsession.toml";

/// Settings file name inside the application directory
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Default tracing filter for the binary
pub const DEFAULT_LOG_FILTER: &str = "tabsession=info";

/// Settings keys and values shared by the session subsystem
pub mod settings {
    /// Key holding the JSON-encoded session document
    pub const SESSION_STATE_KEY: &str = "session_state";

    /// Key holding the startup policy (`blank` or `restore`)
    pub const STARTUP_BEHAVIOR_KEY: &str = "startup-behavior";

    /// Policy value that suppresses automatic restore
    pub const STARTUP_BLANK: &str = "blank";

    /// Policy value that enables automatic restore
    pub const STARTUP_RESTORE: &str = "restore";
}

/// Autosave cadence
pub mod autosave {
    /// Period between two automatic saves, in milliseconds
    pub const DEFAULT_INTERVAL_MS: u64 = 60_000;
}

/// Build the application directory path from a base directory
pub fn app_dir_path(base: &Path) -> PathBuf {
    base.join(APP_DIR_NAME)
}

/// Build config directory path in user's home directory
pub fn user_config_dir_path(home_dir: &Path) -> PathBuf {
    app_dir_path(home_dir)
}

/// Build config file path in user's home directory
pub fn user_config_file_path(home_dir: &Path) -> PathBuf {
    user_config_dir_path(home_dir).join(CONFIG_FILE_NAME)
}

/// Build local config file path in current directory
pub fn local_config_file_path(current_dir: &Path) -> PathBuf {
    app_dir_path(current_dir).join(CONFIG_FILE_NAME)
}

/// Build the default settings file path in user's home directory
pub fn user_settings_file_path(home_dir: &Path) -> PathBuf {
    user_config_dir_path(home_dir).join(SETTINGS_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_paths() {
        let home_dir = Path::new("/home/user");
        let current_dir = Path::new("/current/project");

        assert_eq!(
            user_config_file_path(home_dir),
            Path::new("/home/user/.tabsession/config.toml")
        );

        assert_eq!(
            local_config_file_path(current_dir),
            Path::new("/current/project/.tabsession/config.toml")
        );

        assert_eq!(
            user_settings_file_path(home_dir),
            Path::new("/home/user/.tabsession/settings.json")
        );
    }
}
