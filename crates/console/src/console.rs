//! Interactive console: menu loop and action handlers

use anyhow::Result;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info, warn};

use toolkit_core::application::{
    stop_channel, BuildScriptGenerator, Monitor, ReportService, SettingsService, SuiteRunner,
};
use toolkit_core::domain::{AlertThresholds, CheckKind, ToolkitConfig};
use toolkit_core::port::artifact_store::to_pretty_json;
use toolkit_core::{AppError, VERSION};

use crate::display;
use crate::menu::{parse_choice, MenuAction, MenuId, Prompt};

/// Application services the console drives
pub struct ConsoleServices {
    pub settings: SettingsService,
    pub runner: SuiteRunner,
    pub reports: ReportService,
    pub monitor: Monitor,
    pub build_scripts: BuildScriptGenerator,
}

pub struct Console {
    config: ToolkitConfig,
    services: ConsoleServices,
    prompt: Prompt,
}

/// Comma separated list, blanks dropped
fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_yes(input: &str) -> bool {
    matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn interrupted(task: &str) {
    warn!(task, "Interrupted by operator");
    display::notice(&format!("{} interrupted", task));
}

impl Console {
    /// Load the configuration and prepare the menu loop
    pub async fn new(services: ConsoleServices, prompt: Prompt) -> Self {
        let config = services.settings.load().await;
        Self {
            config,
            services,
            prompt,
        }
    }

    /// Run until the operator exits the main menu or input ends
    pub async fn run(&mut self) {
        info!(version = VERSION, "Server Test Toolkit started");
        let mut stack = vec![MenuId::Main];

        while let Some(&current) = stack.last() {
            let Some(action) = self.select(current).await else {
                stack.pop();
                continue;
            };
            match action {
                MenuAction::Back => {
                    stack.pop();
                }
                MenuAction::Open(id) => stack.push(id),
                other => self.perform(other).await,
            }
        }

        info!("Server Test Toolkit exiting");
    }

    /// Show a menu and read a valid choice; `None` when input ends
    async fn select(&mut self, id: MenuId) -> Option<MenuAction> {
        let menu = id.menu();
        display::menu(menu);

        loop {
            let prompt = format!("Select an option [1-{}]: ", menu.entries.len());
            let line = self.prompt.read_line(&prompt).await?;
            match parse_choice(&line, menu.entries.len()) {
                Some(index) => return Some(menu.entries[index].1),
                None => display::notice("Invalid choice, please try again"),
            }
        }
    }

    async fn perform(&mut self, action: MenuAction) {
        let outcome = match action {
            MenuAction::RunSuite(kind) => self.run_suite(kind).await,
            MenuAction::FullSuite => self.run_full_suite().await,
            MenuAction::GenerateBuildScript => self.generate_build_script().await,
            MenuAction::RealTimeMonitor => self.real_time_monitor().await,
            MenuAction::AlertConfiguration => self.alert_configuration().await,
            MenuAction::MonitoringReport => self.monitoring_report().await,
            MenuAction::TestReport => self.test_report().await,
            MenuAction::TrendAnalysis => self.trend_analysis().await,
            MenuAction::ExecutiveSummary => self.executive_summary().await,
            MenuAction::ExportResults => self.export_results().await,
            MenuAction::ViewConfig => self.view_config(),
            MenuAction::EditServer => self.edit_server().await,
            MenuAction::EditTesting => self.edit_testing().await,
            MenuAction::EditMonitoring => self.edit_monitoring().await,
            MenuAction::ResetConfig => self.reset_config().await,
            MenuAction::About => {
                self.about();
                Ok(())
            }
            MenuAction::Open(_) | MenuAction::Back => Ok(()),
        };

        if let Err(e) = outcome {
            error!(action = ?action, error = %e, "Menu action failed");
            display::failure(&e.to_string());
        }
    }

    // ------------------------------------------------------------------
    // Suites
    // ------------------------------------------------------------------

    async fn run_suite(&mut self, kind: CheckKind) -> Result<()> {
        display::header(kind.title());
        let run = self
            .services
            .runner
            .run_suite(kind, &self.config, display::check_record);

        tokio::select! {
            outcome = run => match outcome {
                Ok(outcome) => display::suite_outcome(&outcome),
                Err(AppError::NotFound(message)) => display::notice(&message),
                Err(e) => return Err(e.into()),
            },
            _ = tokio::signal::ctrl_c() => interrupted(kind.title()),
        }
        Ok(())
    }

    async fn run_full_suite(&mut self) -> Result<()> {
        let mut current = None;
        let run = self
            .services
            .runner
            .run_full_suite(&self.config, move |kind, record| {
                if current != Some(kind) {
                    display::header(kind.title());
                    current = Some(kind);
                }
                display::check_record(record);
            });

        tokio::select! {
            outcome = run => display::full_suite_outcome(&outcome?),
            _ = tokio::signal::ctrl_c() => interrupted("Full test suite"),
        }
        Ok(())
    }

    async fn generate_build_script(&mut self) -> Result<()> {
        let path = self.services.build_scripts.generate(&self.config).await?;
        display::success(&format!("Build script written to {}", path.display()));
        display::notice("Review the script before running it on the target server");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Monitoring
    // ------------------------------------------------------------------

    async fn real_time_monitor(&mut self) -> Result<()> {
        let thresholds = self.config.monitoring.alert_thresholds.clone();
        let interval = Duration::from_secs(self.config.monitoring.check_interval.max(1));

        display::header("Real-time Monitor");
        display::notice("Press Ctrl+C to stop");

        let (stop_handle, stop_signal) = stop_channel();
        let interrupt = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                stop_handle.stop();
            }
        });

        let samples = self
            .services
            .monitor
            .run(&thresholds, interval, stop_signal, display::monitor_sample)
            .await;
        interrupt.abort();

        display::success(&format!("Monitoring stopped after {} samples", samples));
        Ok(())
    }

    async fn alert_configuration(&mut self) -> Result<()> {
        display::header("Alert Configuration");
        let current = self.config.monitoring.alert_thresholds.clone();

        let Some(cpu) = self.ask("CPU threshold (%)", &current.cpu).await else {
            return Ok(());
        };
        let Some(memory) = self.ask("Memory threshold (%)", &current.memory).await else {
            return Ok(());
        };
        let Some(disk) = self.ask("Disk threshold (%)", &current.disk).await else {
            return Ok(());
        };

        let mut updated = self.config.clone();
        updated.monitoring.alert_thresholds = AlertThresholds { cpu, memory, disk };
        self.apply(updated).await
    }

    async fn monitoring_report(&mut self) -> Result<()> {
        let thresholds = self.config.monitoring.alert_thresholds.clone();
        let (path, sample) = self.services.monitor.write_report(&thresholds).await?;

        display::monitor_sample(&sample);
        display::success(&format!("Monitoring report saved to {}", path.display()));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Reporting
    // ------------------------------------------------------------------

    async fn test_report(&mut self) -> Result<()> {
        match self.services.reports.generate_test_report().await {
            Ok(report) => {
                display::success(&format!(
                    "Report covering {} result files generated",
                    report.artifact_count
                ));
                println!("HTML report: {}", report.html_path.display());
                println!("Summary:     {}", report.summary_path.display());
                Ok(())
            }
            Err(AppError::NotFound(message)) => {
                display::notice(&message);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn trend_analysis(&mut self) -> Result<()> {
        let rows = self.services.reports.trend_analysis().await?;
        display::header("Trend Analysis");
        if rows.is_empty() {
            display::notice("No test results found");
        } else {
            display::trend_analysis(&rows);
        }
        Ok(())
    }

    async fn executive_summary(&mut self) -> Result<()> {
        let summary = self.services.reports.executive_summary().await?;
        display::header("Executive Summary");
        if summary.rows.is_empty() {
            display::notice("No test results found");
        } else {
            display::executive_summary(&summary);
        }
        Ok(())
    }

    async fn export_results(&mut self) -> Result<()> {
        match self.services.reports.export_results().await {
            Ok(export) => {
                display::success(&format!(
                    "Exported {} result files to {}",
                    export.artifact_count,
                    export.path.display()
                ));
                Ok(())
            }
            Err(AppError::NotFound(message)) => {
                display::notice(&message);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    fn view_config(&self) -> Result<()> {
        display::header("Current Configuration");
        println!("{}", to_pretty_json(&self.config)?);
        println!();
        println!("Stored at {}", self.services.settings.location().display());
        Ok(())
    }

    async fn edit_server(&mut self) -> Result<()> {
        display::header("Server Settings");
        let current = self.config.server.clone();

        let Some(host) = self.ask("Host", &current.host).await else {
            return Ok(());
        };
        let Some(port) = self.ask("Port", &current.port).await else {
            return Ok(());
        };
        let Some(username) = self.ask("Username", &current.username).await else {
            return Ok(());
        };
        let Some(timeout) = self.ask("Command timeout (seconds)", &current.timeout).await else {
            return Ok(());
        };

        let mut updated = self.config.clone();
        updated.server.host = host;
        updated.server.port = port;
        updated.server.username = username;
        updated.server.timeout = timeout;
        self.apply(updated).await
    }

    async fn edit_testing(&mut self) -> Result<()> {
        display::header("Testing Settings");
        let current = self.config.testing.clone();

        let Some(performance_duration) = self
            .ask("Performance test duration (seconds)", &current.performance_duration)
            .await
        else {
            return Ok(());
        };
        let Some(load_test_users) = self
            .ask("Load test users", &current.load_test_users)
            .await
        else {
            return Ok(());
        };
        let Some(stress_test_duration) = self
            .ask("Stress test duration (seconds)", &current.stress_test_duration)
            .await
        else {
            return Ok(());
        };

        let mut updated = self.config.clone();
        updated.testing.performance_duration = performance_duration;
        updated.testing.load_test_users = load_test_users;
        updated.testing.stress_test_duration = stress_test_duration;
        self.apply(updated).await
    }

    async fn edit_monitoring(&mut self) -> Result<()> {
        display::header("Monitoring Settings");
        let current = self.config.monitoring.clone();

        let Some(check_interval) = self
            .ask("Check interval (seconds)", &current.check_interval)
            .await
        else {
            return Ok(());
        };
        let services_prompt = format!(
            "Monitored services, comma separated [{}]: ",
            current.services.join(", ")
        );
        let Some(services) = self.prompt.read_line(&services_prompt).await else {
            return Ok(());
        };

        let mut updated = self.config.clone();
        updated.monitoring.check_interval = check_interval;
        if !services.trim().is_empty() {
            updated.monitoring.services = parse_list(&services);
        }
        self.apply(updated).await
    }

    async fn reset_config(&mut self) -> Result<()> {
        let Some(answer) = self
            .prompt
            .read_line("Reset configuration to defaults? [y/N]: ")
            .await
        else {
            return Ok(());
        };
        if !is_yes(&answer) {
            display::notice("Configuration unchanged");
            return Ok(());
        }

        self.config = self.services.settings.reset().await?;
        display::success("Configuration reset to defaults");
        Ok(())
    }

    /// Validate and save; a rejected value leaves the current config alone
    async fn apply(&mut self, updated: ToolkitConfig) -> Result<()> {
        match self.services.settings.apply(updated).await {
            Ok(saved) => {
                self.config = saved;
                display::success(&format!(
                    "Configuration saved to {}",
                    self.services.settings.location().display()
                ));
                Ok(())
            }
            Err(AppError::Domain(e)) => {
                display::failure(&format!("Configuration not saved: {}", e));
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Ask for a value, showing the current one; empty input keeps it
    ///
    /// `None` when input ends, which abandons the whole edit.
    async fn ask<T>(&mut self, label: &str, current: &T) -> Option<T>
    where
        T: FromStr + Display + Clone,
    {
        loop {
            let line = self
                .prompt
                .read_line(&format!("{} [{}]: ", label, current))
                .await?;
            let line = line.trim();
            if line.is_empty() {
                return Some(current.clone());
            }
            match line.parse() {
                Ok(value) => return Some(value),
                Err(_) => display::notice(&format!("Invalid value for {}", label)),
            }
        }
    }

    fn about(&self) {
        display::header("About");
        println!("Server Test Toolkit v{}", VERSION);
        println!("Build, test, monitor and report on Linux servers from one menu.");
        println!("Every check runs as a shell command with a timeout; results are");
        println!("saved as timestamped JSON files and rolled up into reports.");
        println!();
        println!(
            "Configuration: {}",
            self.services.settings.location().display()
        );
    }
}
