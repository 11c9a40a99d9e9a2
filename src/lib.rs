//! # tabsession
//!
//! Session-state persistence for a tabbed diagram editor. The open editor tabs
//! (graph, proof and rule panels) are snapshotted into a single record in a
//! settings store and rebuilt on the next launch, tolerating partially corrupted
//! data without losing the tabs that are still readable.
//!
//! ## Architecture Overview
//!
//! - **[`settings`]**: key/value settings store abstraction and the startup policy
//! - **[`graph`]**: reference diagram model with a JSON encoding
//! - **[`panel`]**: the closed set of editor panel kinds
//! - **[`session`]**: panel codec, session document and the save/restore manager
//! - **[`tabs`]**: the tab host seam and an in-memory tab strip
//! - **[`autosave`]**: periodic saving on the tokio runtime
//! - **[`integration`]**: editor lifecycle (restore on start, save on close)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tabsession::{EditorSystem, WorkbenchConfig};
//! use tabsession::settings::FileSettingsStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = FileSettingsStore::open("settings.json")?;
//!     let editor = EditorSystem::new(store, &WorkbenchConfig::default()).await;
//!
//!     if editor.restored_on_startup() {
//!         println!("Previous session reopened");
//!     }
//!
//!     editor.shutdown().await?;
//!     Ok(())
//! }
//! ```

/// Settings storage and startup policy.
///
/// The session subsystem only needs `get`/`set`/`remove` on string keys; the
/// store behind it is injected.
pub mod settings;

/// Reference diagram model.
pub mod graph;

/// Editor panels.
pub mod panel;

/// Session snapshot and restore.
///
/// Encodes the open panels into a session document, writes it to the settings
/// store, and rebuilds panels from it with per-tab fault isolation.
pub mod session;

/// Tab host abstraction.
pub mod tabs;

/// Periodic autosave.
pub mod autosave;

/// Editor lifecycle integration and configuration.
pub mod integration;

/// Environment constants and path utilities.
///
/// Centralizes settings keys, file names and directory layout used throughout
/// the application for easier maintenance and consistency.
pub mod env;

// CLI module for command-line interface
pub mod cli;

// Re-export settings types
pub use settings::{FileSettingsStore, MemorySettingsStore, SettingsStore, StartupBehavior};

// Re-export panel types
pub use panel::{FileFormat, Panel};

// Re-export main session types
pub use session::{RestoreReport, SaveReport, SessionConfig, SessionError, SessionStateManager};

// Re-export tab types
pub use tabs::{TabHost, TabStrip};

// Re-export integration types
pub use integration::{EditorSystem, SharedWorkbench, Workbench, WorkbenchConfig};
