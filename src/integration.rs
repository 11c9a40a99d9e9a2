//! # Editor Integration
//!
//! Wires the tab set, the session state manager and the autosave scheduler
//! into the lifecycle of an editor window.
//!
//! ## Core Components
//!
//! - **[`Workbench`]**: the open tabs plus the session manager that persists them
//! - **[`EditorSystem`]**: startup restore, autosave and the close-time save
//! - **[`WorkbenchConfig`]**: unified configuration, loadable from TOML
//!
//! ## Triggers
//!
//! ```text
//!   explicit save ─┐
//!   autosave tick ─┼──> Workbench::save_session ──> SessionStateManager::save
//!   window close ──┘
//! ```
//!
//! Restore happens once, at startup, and only when the startup policy allows it.
//! Saving is never gated by the policy.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use tabsession::{EditorSystem, WorkbenchConfig};
//! use tabsession::graph::Graph;
//! use tabsession::panel::GraphPanel;
//! use tabsession::settings::MemorySettingsStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = WorkbenchConfig::default();
//!     let editor = EditorSystem::new(MemorySettingsStore::new(), &config).await;
//!
//!     editor
//!         .workbench()
//!         .lock()
//!         .await
//!         .open(GraphPanel::new("Untitled", Graph::new()));
//!
//!     // Saves the open tabs for the next launch
//!     editor.shutdown().await?;
//!     Ok(())
//! }
//! ```

use crate::autosave::AutosaveScheduler;
use crate::env;
use crate::panel::Panel;
use crate::session::{SaveReport, SessionConfig, SessionError, SessionStateManager};
use crate::settings::SettingsStore;
use crate::tabs::{TabHost, TabStrip};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Workbench shared between the UI side and the autosave task
pub type SharedWorkbench<S> = Arc<Mutex<Workbench<S>>>;

/// The open editor tabs and the manager that persists them
pub struct Workbench<S: SettingsStore> {
    tabs: TabStrip,
    session: SessionStateManager<S>,
}

impl<S: SettingsStore> Workbench<S> {
    pub fn new(store: S, config: SessionConfig) -> Self {
        Self {
            tabs: TabStrip::new(),
            session: SessionStateManager::new(store, config),
        }
    }

    pub fn tabs(&self) -> &TabStrip {
        &self.tabs
    }

    pub fn tabs_mut(&mut self) -> &mut TabStrip {
        &mut self.tabs
    }

    pub fn session(&self) -> &SessionStateManager<S> {
        &self.session
    }

    /// Open a panel in a new, focused tab
    pub fn open(&mut self, panel: impl Into<Panel>) -> usize {
        self.tabs.add_tab(panel.into())
    }

    pub fn close_tab(&mut self, index: usize) -> Option<Panel> {
        self.tabs.remove_tab(index)
    }

    /// Save the open tabs; the one entry point behind every save trigger
    pub fn save_session(&self) -> Result<SaveReport, SessionError> {
        self.session.save_host(&self.tabs)
    }

    /// Policy-gated restore into the open tabs
    pub fn restore_session(&mut self) -> bool {
        self.session.restore(&mut self.tabs)
    }
}

/// Editor window lifecycle: restore on start, autosave while open, save on close
pub struct EditorSystem<S: SettingsStore + 'static> {
    workbench: SharedWorkbench<S>,
    autosave: Option<AutosaveScheduler>,
    restored_on_startup: bool,
}

impl<S: SettingsStore + 'static> EditorSystem<S> {
    /// Start the editor: restore the previous session if allowed, then
    /// start autosave. Must be called from within a tokio runtime.
    pub async fn new(store: S, config: &WorkbenchConfig) -> Self {
        let mut workbench = Workbench::new(store, config.session.clone());

        let restored_on_startup = workbench.restore_session();
        if restored_on_startup {
            info!(
                "Reopened {} tabs from the previous session",
                workbench.tabs().tab_count()
            );
        }

        let workbench = Arc::new(Mutex::new(workbench));
        let autosave = config
            .autosave_period()
            .map(|period| AutosaveScheduler::start(workbench.clone(), period));

        Self {
            workbench,
            autosave,
            restored_on_startup,
        }
    }

    pub fn workbench(&self) -> SharedWorkbench<S> {
        self.workbench.clone()
    }

    pub fn restored_on_startup(&self) -> bool {
        self.restored_on_startup
    }

    pub fn autosave(&self) -> Option<&AutosaveScheduler> {
        self.autosave.as_ref()
    }

    /// Explicit save, e.g. from a menu action
    pub async fn save_session(&self) -> Result<SaveReport, SessionError> {
        self.workbench.lock().await.save_session()
    }

    /// Close hook: stop autosave and save unconditionally, whatever the
    /// startup policy says
    pub async fn shutdown(self) -> Result<SaveReport, SessionError> {
        info!("Shutting down editor...");

        if let Some(autosave) = &self.autosave {
            autosave.stop();
        }

        let report = self.workbench.lock().await.save_session();
        match &report {
            Ok(report) => info!("Editor shutdown complete ({} tabs saved)", report.tabs_written),
            Err(e) => warn!("Editor shutdown could not save the session: {}", e),
        }
        report
    }
}

/// Unified configuration for the editor session subsystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbenchConfig {
    /// Settings file; defaults to `~/.tabsession/settings.json`
    pub settings_path: Option<PathBuf>,
    pub enable_autosave: bool,
    pub autosave_interval_ms: u64,
    pub log_filter: String,
    pub session: SessionConfig,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            settings_path: None,
            enable_autosave: true,
            autosave_interval_ms: env::autosave::DEFAULT_INTERVAL_MS,
            log_filter: env::DEFAULT_LOG_FILTER.to_string(),
            session: SessionConfig::default(),
        }
    }
}

impl WorkbenchConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Save configuration to a TOML file
    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content).context("Failed to write config file")
    }

    /// Convert configuration to a TOML string
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }

    /// Autosave period, or `None` when autosave is off
    pub fn autosave_period(&self) -> Option<Duration> {
        if self.enable_autosave && self.autosave_interval_ms > 0 {
            Some(Duration::from_millis(self.autosave_interval_ms))
        } else {
            None
        }
    }

    /// Settings file to use, relative to `home_dir` when not configured
    pub fn resolve_settings_path(&self, home_dir: Option<&Path>) -> PathBuf {
        match (&self.settings_path, home_dir) {
            (Some(path), _) => path.clone(),
            (None, Some(home)) => env::user_settings_file_path(home),
            (None, None) => PathBuf::from(env::SETTINGS_FILE_NAME),
        }
    }
}
