//! Menu tables and operator input
//!
//! Each menu is a static table of `(label, MenuAction)`; the console matches
//! on the selected action.

use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use toolkit_core::domain::CheckKind;

/// Menus reachable from the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuId {
    Main,
    BuildTools,
    TestingSuite,
    Monitoring,
    Reporting,
    Configuration,
}

/// What a menu entry does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Open(MenuId),
    /// Run one catalog suite and save its results
    RunSuite(CheckKind),
    FullSuite,
    GenerateBuildScript,
    RealTimeMonitor,
    AlertConfiguration,
    MonitoringReport,
    TestReport,
    TrendAnalysis,
    ExecutiveSummary,
    ExportResults,
    ViewConfig,
    EditServer,
    EditTesting,
    EditMonitoring,
    ResetConfig,
    About,
    /// Leave the current menu (exits the program from the main menu)
    Back,
}

pub struct Menu {
    pub title: &'static str,
    pub entries: &'static [(&'static str, MenuAction)],
}

const MAIN_MENU: Menu = Menu {
    title: "Server Test Toolkit",
    entries: &[
        ("Build Tools", MenuAction::Open(MenuId::BuildTools)),
        ("Testing Suite", MenuAction::Open(MenuId::TestingSuite)),
        ("Monitoring", MenuAction::Open(MenuId::Monitoring)),
        ("Reporting", MenuAction::Open(MenuId::Reporting)),
        ("Configuration", MenuAction::Open(MenuId::Configuration)),
        ("About", MenuAction::About),
        ("Exit", MenuAction::Back),
    ],
};

const BUILD_TOOLS_MENU: Menu = Menu {
    title: "Build Tools",
    entries: &[
        ("Validate Server Configuration", MenuAction::RunSuite(CheckKind::ConfigValidation)),
        ("Generate Build Script", MenuAction::GenerateBuildScript),
        ("Install Test Packages", MenuAction::RunSuite(CheckKind::PackageInstall)),
        ("Configure Services", MenuAction::RunSuite(CheckKind::ServiceConfiguration)),
        ("Network Configuration", MenuAction::RunSuite(CheckKind::NetworkConfiguration)),
        ("OS Installation", MenuAction::RunSuite(CheckKind::OsInstallation)),
        ("Back", MenuAction::Back),
    ],
};

const TESTING_SUITE_MENU: Menu = Menu {
    title: "Testing Suite",
    entries: &[
        ("Health Check", MenuAction::RunSuite(CheckKind::HealthCheck)),
        ("Performance Benchmark", MenuAction::RunSuite(CheckKind::PerformanceBenchmark)),
        ("Load Test", MenuAction::RunSuite(CheckKind::LoadTest)),
        ("Stress Test", MenuAction::RunSuite(CheckKind::StressTest)),
        ("Network Connectivity", MenuAction::RunSuite(CheckKind::NetworkConnectivity)),
        ("Security Scan", MenuAction::RunSuite(CheckKind::SecurityScan)),
        ("Compatibility Test", MenuAction::RunSuite(CheckKind::CompatibilityTest)),
        ("Full Test Suite", MenuAction::FullSuite),
        ("Back", MenuAction::Back),
    ],
};

const MONITORING_MENU: Menu = Menu {
    title: "Monitoring",
    entries: &[
        ("Real-time Monitor", MenuAction::RealTimeMonitor),
        ("Service Availability", MenuAction::RunSuite(CheckKind::ServiceAvailability)),
        ("Performance Monitoring", MenuAction::RunSuite(CheckKind::PerformanceMonitoring)),
        ("Log Analysis", MenuAction::RunSuite(CheckKind::LogAnalysis)),
        ("Alert Configuration", MenuAction::AlertConfiguration),
        ("Generate Monitoring Report", MenuAction::MonitoringReport),
        ("Back", MenuAction::Back),
    ],
};

const REPORTING_MENU: Menu = Menu {
    title: "Reporting",
    entries: &[
        ("Generate Test Report", MenuAction::TestReport),
        ("Trend Analysis", MenuAction::TrendAnalysis),
        ("Executive Summary", MenuAction::ExecutiveSummary),
        ("Export Results", MenuAction::ExportResults),
        ("Back", MenuAction::Back),
    ],
};

const CONFIGURATION_MENU: Menu = Menu {
    title: "Configuration",
    entries: &[
        ("View Configuration", MenuAction::ViewConfig),
        ("Edit Server Settings", MenuAction::EditServer),
        ("Edit Testing Settings", MenuAction::EditTesting),
        ("Edit Monitoring Settings", MenuAction::EditMonitoring),
        ("Reset to Defaults", MenuAction::ResetConfig),
        ("Back", MenuAction::Back),
    ],
};

impl MenuId {
    pub fn menu(self) -> &'static Menu {
        match self {
            MenuId::Main => &MAIN_MENU,
            MenuId::BuildTools => &BUILD_TOOLS_MENU,
            MenuId::TestingSuite => &TESTING_SUITE_MENU,
            MenuId::Monitoring => &MONITORING_MENU,
            MenuId::Reporting => &REPORTING_MENU,
            MenuId::Configuration => &CONFIGURATION_MENU,
        }
    }
}

/// 1-based menu choice to entry index
pub fn parse_choice(input: &str, entry_count: usize) -> Option<usize> {
    let choice: usize = input.trim().parse().ok()?;
    (1..=entry_count).contains(&choice).then(|| choice - 1)
}

/// Line-oriented operator input
///
/// `None` means the operator is done: stdin closed or Ctrl-C at the prompt.
pub struct Prompt {
    lines: Lines<Box<dyn AsyncBufRead + Unpin + Send>>,
}

impl Prompt {
    pub fn new(reader: impl AsyncBufRead + Unpin + Send + 'static) -> Self {
        let reader: Box<dyn AsyncBufRead + Unpin + Send> = Box::new(reader);
        Self {
            lines: reader.lines(),
        }
    }

    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }

    pub async fn read_line(&mut self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        let _ = std::io::stdout().flush();

        tokio::select! {
            line = self.lines.next_line() => match line {
                Ok(Some(line)) => Some(line),
                Ok(None) => None,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read operator input");
                    None
                }
            },
            _ = tokio::signal::ctrl_c() => {
                println!();
                None
            }
        }
    }
}
