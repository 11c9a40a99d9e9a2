use anyhow::{Context, Result, bail};
use tabsession::cli::{Args, ConfigDiscovery, ExecutionMode, Overrides, PanelLoader};
use tabsession::session::{SessionError, SessionStateManager};
use tabsession::settings::{FileSettingsStore, StartupBehavior};
use tabsession::tabs::{TabHost, TabStrip};
use tabsession::{Workbench, WorkbenchConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();
    let mode = match args.mode() {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let overrides = args.overrides();

    if mode == ExecutionMode::ShowConfig {
        ConfigDiscovery::show_discovery_info();
        return Ok(());
    }
    if mode == ExecutionMode::InitConfig {
        let path = ConfigDiscovery::create_default_user_config()?;
        println!("✓ Configuration file: {}", path.display());
        return Ok(());
    }

    let config = ConfigDiscovery::load(overrides.config.as_ref())?;
    init_logging(&config);

    let store = open_store(&config, &overrides)?;
    if let ExecutionMode::Open(files) = &mode {
        return open_files(Workbench::new(store, config.session.clone()), files);
    }
    let session = SessionStateManager::new(store, config.session.clone());

    match mode {
        ExecutionMode::Show => show_session(&session),
        ExecutionMode::Restore { force } => restore_session(&session, force),
        ExecutionMode::Clear => {
            session.clear()?;
            println!("✓ Stored session cleared");
            Ok(())
        }
        ExecutionMode::SetStartup(behavior) => {
            session.set_startup_behavior(behavior)?;
            println!("✓ Startup behavior set to '{}'", behavior);
            Ok(())
        }
        ExecutionMode::Open(_) | ExecutionMode::ShowConfig | ExecutionMode::InitConfig => Ok(()),
    }
}

/// `RUST_LOG` wins over the configured filter
fn init_logging(config: &WorkbenchConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_store(config: &WorkbenchConfig, overrides: &Overrides) -> Result<FileSettingsStore> {
    let path = ConfigDiscovery::settings_path(config, overrides.settings.as_ref());
    info!("Using settings file: {:?}", path);
    FileSettingsStore::open(&path).with_context(|| format!("Failed to open settings file {:?}", path))
}

fn show_session(session: &SessionStateManager<FileSettingsStore>) -> Result<()> {
    println!("Startup behavior: {}", session.startup_behavior());

    let stored = match session.load() {
        Ok(stored) => stored,
        Err(SessionError::NoSession) => {
            println!("No saved session");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(saved_at) = stored.saved_at() {
        println!("Saved at: {}", saved_at.to_rfc3339());
    }
    println!("Stored tabs: {}", stored.len());

    let active = stored.active_index();
    for (position, record) in stored.records().enumerate() {
        let marker = if active == Some(position) { "*" } else { " " };
        match record {
            Ok(record) => {
                let file = match (&record.file_path, &record.file_type) {
                    (Some(path), Some(file_type)) => format!(" [{} {}]", file_type, path),
                    (Some(path), None) => format!(" [{}]", path),
                    _ => String::new(),
                };
                println!(
                    " {} {}. {:<5} {}{}",
                    marker, position, record.kind, record.name, file
                );
            }
            Err(e) => println!(" {} {}. ✗ {}", marker, position, e),
        }
    }

    Ok(())
}

fn restore_session(session: &SessionStateManager<FileSettingsStore>, force: bool) -> Result<()> {
    let mut tabs = TabStrip::new();
    let result = if force {
        session.restore_forced(&mut tabs)
    } else {
        session.restore_report(&mut tabs)
    };

    let report = match result {
        Ok(report) => report,
        Err(SessionError::PolicyBlank) => {
            println!("Startup behavior is 'blank'; use --force to restore anyway");
            return Ok(());
        }
        Err(SessionError::NoSession) => {
            println!("No saved session");
            return Ok(());
        }
        Err(e) => bail!("Restore failed: {}", e),
    };

    println!(
        "Restored {} tabs, skipped {}",
        report.restored,
        report.skipped.len()
    );
    for (index, title) in tabs.titles().iter().enumerate() {
        let marker = if tabs.current_index() == Some(index) { "*" } else { " " };
        println!(" {} {}. {}", marker, index, title);
    }
    for skipped in &report.skipped {
        println!(
            "   ✗ record {} ({}): {}",
            skipped.position,
            skipped.name.as_deref().unwrap_or("unnamed"),
            skipped.reason
        );
    }

    Ok(())
}

/// Replace the stored session with `files`, last one active
fn open_files(mut workbench: Workbench<FileSettingsStore>, files: &[PathBuf]) -> Result<()> {
    for file in files {
        let panel = PanelLoader::load(file)?;
        let index = workbench.open(panel);
        info!("Opened {:?} as tab {}", file, index);
    }

    let report = workbench.save_session()?;
    println!(
        "✓ Saved session with {} tabs ({} bytes)",
        report.tabs_written, report.bytes_written
    );
    for omitted in &report.omitted {
        println!("   ✗ {} left out: {}", omitted.title, omitted.reason);
    }

    if workbench.session().startup_behavior() == StartupBehavior::Blank {
        println!("Note: startup behavior is 'blank', the session will not reopen automatically");
    }
    Ok(())
}
