//! CLI-specific functionality for tabsession
//!
//! This module contains all CLI-related code including argument parsing,
//! diagram file loading, and configuration discovery.

pub mod args;
pub mod config;
pub mod files;

pub use args::{Args, Commands, ExecutionMode, Overrides};
pub use config::ConfigDiscovery;
pub use files::{FileError, PanelLoader};
