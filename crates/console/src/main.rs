//! Server Test Toolkit - Main Entry Point
//! Interactive menu console over the check suites, monitor and reports

mod console;
mod display;
mod menu;
mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use toolkit_core::application::{
    BuildScriptGenerator, Monitor, ReportService, SettingsService, SuiteRunner,
};
use toolkit_core::port::time_provider::SystemTimeProvider;
use toolkit_core::VERSION;
use toolkit_infra_fs::{
    FsArtifactStore, JsonConfigStore, WorkspacePaths, DEFAULT_CONFIG_FILE, DEFAULT_REPORTS_DIR,
    DEFAULT_RESULTS_DIR, DEFAULT_SCRIPTS_DIR,
};
use toolkit_infra_system::{ShellCommandRunner, SysinfoProbe};

use crate::console::{Console, ConsoleServices};
use crate::menu::Prompt;
use crate::telemetry::{LogFormat, LogLevel};

const DEFAULT_LOG_FILE: &str = "toolkit.log";

#[derive(Parser, Debug)]
#[command(name = "server-toolkit")]
#[command(about = "Build, test, monitor and report on Linux servers", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (created with defaults if missing)
    #[arg(long, env = "SERVER_TOOLKIT_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    /// Minimum log level (RUST_LOG takes precedence)
    #[arg(long, value_enum, default_value = "INFO")]
    log_level: LogLevel,

    /// Log file layout
    #[arg(long, value_enum, env = "SERVER_TOOLKIT_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// Append-only process log
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: String,

    /// Directory for suite result files
    #[arg(long, default_value = DEFAULT_RESULTS_DIR)]
    results_dir: String,

    /// Directory for generated reports and exports
    #[arg(long, default_value = DEFAULT_REPORTS_DIR)]
    reports_dir: String,

    /// Directory for generated build scripts
    #[arg(long, default_value = DEFAULT_SCRIPTS_DIR)]
    scripts_dir: String,
}

/// Expand a leading `~` to the home directory
fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Initialize logging (file + stderr)
    let _log_guard =
        telemetry::init_logging(&expand_path(&cli.log_file), cli.log_level, cli.log_format)?;

    info!("Server Test Toolkit v{} starting...", VERSION);

    // 2. Prepare workspace directories
    let paths = WorkspacePaths::new(
        expand_path(&cli.results_dir),
        expand_path(&cli.reports_dir),
        expand_path(&cli.scripts_dir),
    );
    info!(
        results = %paths.results_dir.display(),
        reports = %paths.reports_dir.display(),
        scripts = %paths.scripts_dir.display(),
        "Initializing workspace..."
    );
    let artifact_store = Arc::new(
        FsArtifactStore::open(paths)
            .await
            .context("Failed to prepare artifact directories")?,
    );

    // 3. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let config_store = Arc::new(JsonConfigStore::new(expand_path(&cli.config)));
    let command_runner = Arc::new(ShellCommandRunner::new());
    let system_probe = Arc::new(SysinfoProbe::new());

    let services = ConsoleServices {
        settings: SettingsService::new(config_store),
        runner: SuiteRunner::new(
            command_runner,
            artifact_store.clone(),
            time_provider.clone(),
        ),
        reports: ReportService::new(artifact_store.clone(), time_provider.clone()),
        monitor: Monitor::new(system_probe, artifact_store.clone(), time_provider.clone()),
        build_scripts: BuildScriptGenerator::new(artifact_store, time_provider),
    };

    // 4. Menu loop until the operator exits
    let mut console = Console::new(services, Prompt::stdin()).await;
    console.run().await;

    info!("Shutdown complete.");
    Ok(())
}
