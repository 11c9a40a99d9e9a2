//! Command line argument parsing
//!
//! This module handles CLI argument parsing with subcommands:
//! - `show`: Print the stored session
//! - `restore`: Restore the stored session and report what came back
//! - `open`: Open diagram files as tabs and save them as the session
//! - `clear`: Remove the stored session
//! - `startup`: Set the startup behavior (`blank` or `restore`)
//! - `show-config`: Show configuration discovery information
//! - `init-config`: Write a default user configuration file

use crate::settings::StartupBehavior;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, PartialEq)]
pub enum ExecutionMode {
    Show,
    Restore { force: bool },
    Open(Vec<PathBuf>),
    Clear,
    SetStartup(StartupBehavior),
    ShowConfig,
    InitConfig,
}

/// Paths that override configuration discovery
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub settings: Option<PathBuf>,
}

#[derive(Debug, Parser)]
#[command(name = "tabsession")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect and manage the saved editor session")]
#[command(long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Settings file holding the session
    #[arg(short = 's', long = "settings", global = true)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the stored tabs and the active tab
    Show,
    /// Restore the stored session and report restored and skipped tabs
    Restore {
        /// Restore even when the startup behavior is 'blank'
        #[arg(short = 'f', long = "force")]
        force: bool,
    },
    /// Open diagram files (.zxg, .json, .zxp, .zxr) and save them as the session
    Open {
        /// Files to open, in tab order; the last one becomes active
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Remove the stored session
    Clear,
    /// Set what happens to the saved session at startup
    Startup {
        /// `blank` or `restore`
        behavior: StartupBehavior,
    },
    /// Show configuration discovery information
    ShowConfig,
    /// Write a default config to ~/.tabsession/config.toml if none exists
    InitConfig,
}

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            config: self.config.clone(),
            settings: self.settings.clone(),
        }
    }

    pub fn mode(&self) -> Result<ExecutionMode, String> {
        match &self.command {
            Some(Commands::Show) => Ok(ExecutionMode::Show),
            Some(Commands::Restore { force }) => Ok(ExecutionMode::Restore { force: *force }),
            Some(Commands::Open { files }) => {
                if files.is_empty() {
                    return Err("No files given to open".to_string());
                }
                Ok(ExecutionMode::Open(files.clone()))
            }
            Some(Commands::Clear) => Ok(ExecutionMode::Clear),
            Some(Commands::Startup { behavior }) => Ok(ExecutionMode::SetStartup(*behavior)),
            Some(Commands::ShowConfig) => Ok(ExecutionMode::ShowConfig),
            Some(Commands::InitConfig) => Ok(ExecutionMode::InitConfig),
            None => Err(
                "No command specified. Use 'tabsession --help' to see available commands."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_restore_command() {
        let args = parse(&["tabsession", "restore"]);
        assert_eq!(args.mode().unwrap(), ExecutionMode::Restore { force: false });

        let args = parse(&["tabsession", "restore", "--force"]);
        assert_eq!(args.mode().unwrap(), ExecutionMode::Restore { force: true });
    }

    #[test]
    fn test_open_command_keeps_order() {
        let args = parse(&["tabsession", "open", "a.zxg", "b.zxp", "c.zxr"]);
        assert_eq!(
            args.mode().unwrap(),
            ExecutionMode::Open(vec![
                PathBuf::from("a.zxg"),
                PathBuf::from("b.zxp"),
                PathBuf::from("c.zxr"),
            ])
        );
    }

    #[test]
    fn test_open_requires_files() {
        assert!(Args::try_parse_from(["tabsession", "open"]).is_err());
    }

    #[test]
    fn test_startup_command() {
        let args = parse(&["tabsession", "startup", "blank"]);
        assert_eq!(
            args.mode().unwrap(),
            ExecutionMode::SetStartup(StartupBehavior::Blank)
        );

        assert!(Args::try_parse_from(["tabsession", "startup", "sometimes"]).is_err());
    }

    #[test]
    fn test_config_commands() {
        let args = parse(&["tabsession", "show-config"]);
        assert_eq!(args.mode().unwrap(), ExecutionMode::ShowConfig);

        let args = parse(&["tabsession", "init-config"]);
        assert_eq!(args.mode().unwrap(), ExecutionMode::InitConfig);
    }

    #[test]
    fn test_global_overrides() {
        let args = parse(&[
            "tabsession",
            "show",
            "--settings",
            "/tmp/settings.json",
            "--config",
            "/tmp/config.toml",
        ]);
        assert_eq!(args.mode().unwrap(), ExecutionMode::Show);
        assert_eq!(
            args.overrides(),
            Overrides {
                config: Some(PathBuf::from("/tmp/config.toml")),
                settings: Some(PathBuf::from("/tmp/settings.json")),
            }
        );
    }

    #[test]
    fn test_no_command_error() {
        let args = Args {
            config: None,
            settings: None,
            command: None,
        };
        assert!(args.mode().is_err());
    }
}
