// Check Domain Model - labeled commands and their captured results

use super::command_result::CommandResult;
use super::error::DomainError;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// A caller-supplied label plus a literal shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub label: String,
    pub command: String,
    /// Per-check timeout; `None` falls back to `server.timeout`
    pub timeout_secs: Option<u64>,
}

impl Check {
    pub fn new(label: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            command: command.into(),
            timeout_secs: None,
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }
}

/// Suite of checks the toolkit knows how to run
///
/// The command catalog for each kind lives in `application::catalog`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CheckKind {
    ConfigValidation,
    HealthCheck,
    PerformanceBenchmark,
    LoadTest,
    StressTest,
    NetworkConnectivity,
    SecurityScan,
    CompatibilityTest,
    PackageInstall,
    ServiceConfiguration,
    NetworkConfiguration,
    OsInstallation,
    ServiceAvailability,
    PerformanceMonitoring,
    LogAnalysis,
}

impl CheckKind {
    pub const ALL: [CheckKind; 15] = [
        CheckKind::ConfigValidation,
        CheckKind::HealthCheck,
        CheckKind::PerformanceBenchmark,
        CheckKind::LoadTest,
        CheckKind::StressTest,
        CheckKind::NetworkConnectivity,
        CheckKind::SecurityScan,
        CheckKind::CompatibilityTest,
        CheckKind::PackageInstall,
        CheckKind::ServiceConfiguration,
        CheckKind::NetworkConfiguration,
        CheckKind::OsInstallation,
        CheckKind::ServiceAvailability,
        CheckKind::PerformanceMonitoring,
        CheckKind::LogAnalysis,
    ];

    /// Prefix used in artifact file names (`{slug}_{timestamp}.json`)
    pub fn slug(&self) -> &'static str {
        match self {
            CheckKind::ConfigValidation => "config_validation",
            CheckKind::HealthCheck => "health_check",
            CheckKind::PerformanceBenchmark => "performance_benchmark",
            CheckKind::LoadTest => "load_test",
            CheckKind::StressTest => "stress_test",
            CheckKind::NetworkConnectivity => "network_connectivity",
            CheckKind::SecurityScan => "security_scan",
            CheckKind::CompatibilityTest => "compatibility_test",
            CheckKind::PackageInstall => "package_install",
            CheckKind::ServiceConfiguration => "service_configuration",
            CheckKind::NetworkConfiguration => "network_configuration",
            CheckKind::OsInstallation => "os_installation",
            CheckKind::ServiceAvailability => "service_availability",
            CheckKind::PerformanceMonitoring => "performance_monitoring",
            CheckKind::LogAnalysis => "log_analysis",
        }
    }

    /// Human-readable name for menus and reports
    pub fn title(&self) -> &'static str {
        match self {
            CheckKind::ConfigValidation => "Configuration Validation",
            CheckKind::HealthCheck => "Server Health Check",
            CheckKind::PerformanceBenchmark => "Performance Benchmark",
            CheckKind::LoadTest => "Load Testing",
            CheckKind::StressTest => "Stress Testing",
            CheckKind::NetworkConnectivity => "Network Connectivity Test",
            CheckKind::SecurityScan => "Security Scan",
            CheckKind::CompatibilityTest => "Compatibility Test",
            CheckKind::PackageInstall => "Package Installation",
            CheckKind::ServiceConfiguration => "System Service Configuration",
            CheckKind::NetworkConfiguration => "Network Configuration",
            CheckKind::OsInstallation => "OS Installation Script",
            CheckKind::ServiceAvailability => "Service Availability Check",
            CheckKind::PerformanceMonitoring => "Performance Monitoring",
            CheckKind::LogAnalysis => "Log Analysis",
        }
    }

    /// Resolve a kind from an artifact file name prefix
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }
}

impl std::str::FromStr for CheckKind {
    type Err = DomainError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_slug(s).ok_or_else(|| DomainError::UnknownCheckKind(s.to_string()))
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// One executed check: label, the literal command (for traceability) and
/// its captured result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRecord {
    pub label: String,
    pub command: String,
    pub result: CommandResult,
}

/// Ordered results of one suite run
///
/// Serializes as a JSON object keyed by label, preserving run order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    kind: CheckKind,
    records: Vec<CheckRecord>,
}

impl ResultSet {
    pub fn new(kind: CheckKind) -> Self {
        Self {
            kind,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: CheckRecord) {
        self.records.push(record);
    }

    pub fn kind(&self) -> CheckKind {
        self.kind
    }

    pub fn records(&self) -> &[CheckRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn passed(&self) -> usize {
        self.records.iter().filter(|r| r.result.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.passed()
    }
}

#[derive(Serialize)]
struct RecordBody<'a> {
    command: &'a str,
    #[serde(flatten)]
    result: &'a CommandResult,
}

impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for record in &self.records {
            map.serialize_entry(
                &record.label,
                &RecordBody {
                    command: &record.command,
                    result: &record.result,
                },
            )?;
        }
        map.end()
    }
}
