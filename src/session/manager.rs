use crate::env;
use crate::panel::Panel;
use crate::session::codec;
use crate::session::document::{SessionDocument, StoredSession};
use crate::session::recovery::*;
use crate::settings::{SettingsStore, StartupBehavior, StoreError};
use crate::tabs::TabHost;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Reasons a save or restore did not go through
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Startup behavior is 'blank'; automatic restore is disabled")]
    PolicyBlank,

    #[error("No saved session")]
    NoSession,

    #[error("Stored session is not a valid document: {0}")]
    StoreParse(#[source] serde_json::Error),

    #[error("Stored session has no tabs")]
    EmptySession,

    #[error("Settings store error: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to serialize session: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Settings keys used by the session manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub session_key: String,
    pub startup_behavior_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_key: env::settings::SESSION_STATE_KEY.to_string(),
            startup_behavior_key: env::settings::STARTUP_BEHAVIOR_KEY.to_string(),
        }
    }
}

/// Saves the open tabs into the settings store and rebuilds them on startup
pub struct SessionStateManager<S: SettingsStore> {
    store: S,
    config: SessionConfig,
}

impl<S: SettingsStore> SessionStateManager<S> {
    pub fn new(store: S, config: SessionConfig) -> Self {
        Self { store, config }
    }

    pub fn with_defaults(store: S) -> Self {
        Self::new(store, SessionConfig::default())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current startup policy. A store that cannot be read counts as the default.
    pub fn startup_behavior(&self) -> StartupBehavior {
        StartupBehavior::load(&self.store, &self.config.startup_behavior_key).unwrap_or_else(|e| {
            warn!("Failed to read startup behavior: {}", e);
            StartupBehavior::default()
        })
    }

    pub fn set_startup_behavior(&self, behavior: StartupBehavior) -> Result<(), SessionError> {
        behavior.save(&self.store, &self.config.startup_behavior_key)?;
        info!("Startup behavior set to '{}'", behavior);
        Ok(())
    }

    /// Persist `panels` (in display order) with `active_index` focused.
    ///
    /// With nothing to save the stored session is removed rather than
    /// overwritten with an empty document. A panel that fails to encode is
    /// left out; the rest of the session is still written.
    pub fn save(
        &self,
        panels: &[Panel],
        active_index: Option<usize>,
    ) -> Result<SaveReport, SessionError> {
        let start_time = Instant::now();
        let mut report = SaveReport::default();

        let mut tabs = Vec::with_capacity(panels.len());
        let mut encoded_positions = Vec::with_capacity(panels.len());
        for (position, panel) in panels.iter().enumerate() {
            match codec::encode(panel) {
                Ok(record) => {
                    tabs.push(record);
                    encoded_positions.push(position);
                }
                Err(e) => {
                    warn!(
                        "Leaving tab {} ('{}') out of the session: {}",
                        position,
                        panel.title(),
                        e
                    );
                    report.omitted.push(OmittedPanel {
                        position,
                        title: panel.title().to_string(),
                        reason: e,
                    });
                }
            }
        }

        if tabs.is_empty() {
            self.clear()?;
            report.cleared = true;
            report.duration_ms = start_time.elapsed().as_millis() as u64;
            debug!("No tabs to save, stored session cleared");
            return Ok(report);
        }

        let active_tab = remap_active_index(active_index, &encoded_positions).unwrap_or(0);
        let document = SessionDocument::new(tabs, active_tab);
        let serialized = document.to_json().map_err(SessionError::Serialize)?;
        self.store.set(&self.config.session_key, &serialized)?;

        report.tabs_written = document.tabs.len();
        report.active_tab = Some(active_tab);
        report.bytes_written = serialized.len() as u64;
        report.duration_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "Session saved: {} tabs, {} bytes in {}ms",
            report.tabs_written, report.bytes_written, report.duration_ms
        );
        Ok(report)
    }

    /// Persist the tabs currently open in `host`
    pub fn save_host(&self, host: &dyn TabHost) -> Result<SaveReport, SessionError> {
        self.save(&host.snapshot(), host.current_index())
    }

    /// Remove the stored session
    pub fn clear(&self) -> Result<(), SessionError> {
        self.store.remove(&self.config.session_key)?;
        Ok(())
    }

    /// Read and parse the stored session without touching any tabs
    pub fn load(&self) -> Result<StoredSession, SessionError> {
        let raw = self
            .store
            .get(&self.config.session_key)?
            .ok_or(SessionError::NoSession)?;
        StoredSession::parse(&raw).map_err(SessionError::StoreParse)
    }

    /// Restore the saved session into `host` if the startup policy allows it.
    ///
    /// Returns true iff at least one tab was installed. Every failure is
    /// logged and absorbed.
    pub fn restore(&self, host: &mut dyn TabHost) -> bool {
        match self.restore_report(host) {
            Ok(report) => report.success(),
            Err(SessionError::PolicyBlank) | Err(SessionError::NoSession) => false,
            Err(e @ SessionError::Store(_)) => {
                error!("Session restore failed: {}", e);
                false
            }
            Err(e) => {
                warn!("Session restore skipped: {}", e);
                false
            }
        }
    }

    /// Policy-gated restore that explains its outcome
    pub fn restore_report(&self, host: &mut dyn TabHost) -> Result<RestoreReport, SessionError> {
        if self.startup_behavior() == StartupBehavior::Blank {
            debug!("Startup behavior is blank, not restoring session");
            return Err(SessionError::PolicyBlank);
        }
        self.restore_forced(host)
    }

    /// Restore regardless of the startup policy, e.g. for an explicit
    /// "reopen last session" action
    pub fn restore_forced(&self, host: &mut dyn TabHost) -> Result<RestoreReport, SessionError> {
        let stored = self.load()?;
        if stored.is_empty() {
            return Err(SessionError::EmptySession);
        }

        info!("Restoring session with {} stored tabs", stored.len());

        let mut report = RestoreReport::default();
        let mut survivors = Vec::new();
        let mut host_indices = Vec::new();

        for (position, record) in stored.records().enumerate() {
            let decoded = record.and_then(|record| {
                codec::decode(&record).map(|panel| (record.name, panel))
            });

            match decoded {
                Ok((name, panel)) => {
                    let index = host.add_tab(panel);
                    debug!("Restored tab {} ('{}') at index {}", position, name, index);
                    survivors.push(position);
                    host_indices.push(index);
                }
                Err(reason) => {
                    let name = stored.name_at(position);
                    warn!(
                        "Skipping stored tab {} ({}): {}",
                        position,
                        name.as_deref().unwrap_or("unnamed"),
                        reason
                    );
                    report.skipped.push(SkippedTab {
                        position,
                        name,
                        reason,
                    });
                }
            }
        }

        report.restored = survivors.len();
        report.active_index = remap_active_index(stored.active_index(), &survivors)
            .map(|survivor| host_indices[survivor]);
        if let Some(index) = report.active_index {
            host.set_current_index(index);
        }

        info!(
            "Session restored: {} tabs, {} skipped",
            report.restored,
            report.skipped.len()
        );
        Ok(report)
    }
}
