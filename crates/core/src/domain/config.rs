// Toolkit Configuration Model
//
// Every section and field has a serde default: a valid file that is missing
// keys is completed from defaults instead of being rejected.

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Longest accepted benchmark or stress duration (24 hours)
pub const MAX_TEST_DURATION_SECS: u64 = 86_400;

/// Top-level configuration file contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ToolkitConfig {
    pub server: ServerSettings,
    pub testing: TestingSettings,
    pub monitoring: MonitoringSettings,
    pub network: NetworkSettings,
    pub build: BuildSettings,
}

/// Target server. Only interpolated into command strings by callers;
/// the harness never reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    /// Default harness timeout in seconds
    pub timeout: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 22,
            username: "root".to_string(),
            timeout: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestingSettings {
    pub performance_duration: u64,
    pub load_test_users: u32,
    pub stress_test_duration: u64,
}

impl Default for TestingSettings {
    fn default() -> Self {
        Self {
            performance_duration: 300,
            load_test_users: 100,
            stress_test_duration: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringSettings {
    /// Seconds between monitor samples
    pub check_interval: u64,
    pub alert_thresholds: AlertThresholds,
    /// Units probed by the service availability check
    pub services: Vec<String>,
}

impl MonitoringSettings {
    /// Configured services in order, blanks and repeats dropped
    pub fn unique_services(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.services.len());
        for service in self.services.iter().map(|s| s.trim()) {
            if !service.is_empty() && !seen.contains(&service) {
                seen.push(service);
            }
        }
        seen
    }
}

impl Default for MonitoringSettings {
    fn default() -> Self {
        Self {
            check_interval: 60,
            alert_thresholds: AlertThresholds::default(),
            services: vec!["ssh".to_string(), "cron".to_string()],
        }
    }
}

/// Usage percentages above which the monitor raises an alert
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    pub cpu: f32,
    pub memory: f32,
    pub disk: f32,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            cpu: 80.0,
            memory: 85.0,
            disk: 90.0,
        }
    }
}

/// Addresses used by the connectivity suite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    pub gateway: String,
    pub scan_subnet: String,
    pub external_host: String,
    pub dns_probe_host: String,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            gateway: "192.168.1.1".to_string(),
            scan_subnet: "192.168.1.0/24".to_string(),
            external_host: "8.8.8.8".to_string(),
            dns_probe_host: "example.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Packages installed by the package suite and build scripts
    pub packages: Vec<String>,
    /// Operator-provided script run by the OS installation suite
    pub os_install_script: String,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            packages: ["sysbench", "iperf3", "nmap", "stress-ng", "apache2-utils", "sysstat"]
                .into_iter()
                .map(String::from)
                .collect(),
            os_install_script: "scripts/os_install.sh".to_string(),
        }
    }
}

impl ToolkitConfig {
    /// Check values that would make generated commands meaningless
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "server.host cannot be empty".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(DomainError::ValidationError(
                "server.port must be between 1 and 65535".to_string(),
            ));
        }
        if self.server.timeout == 0 {
            return Err(DomainError::ValidationError(
                "server.timeout must be a positive number of seconds".to_string(),
            ));
        }
        if self.monitoring.check_interval == 0 {
            return Err(DomainError::ValidationError(
                "monitoring.check_interval must be a positive number of seconds".to_string(),
            ));
        }
        if self.testing.load_test_users == 0 {
            return Err(DomainError::ValidationError(
                "testing.load_test_users must be at least 1".to_string(),
            ));
        }

        for (name, value) in [
            ("testing.performance_duration", self.testing.performance_duration),
            ("testing.stress_test_duration", self.testing.stress_test_duration),
        ] {
            if value == 0 || value > MAX_TEST_DURATION_SECS {
                return Err(DomainError::ValidationError(format!(
                    "{} out of range (1-{}): {}",
                    name, MAX_TEST_DURATION_SECS, value
                )));
            }
        }

        let thresholds = &self.monitoring.alert_thresholds;
        for (name, value) in [
            ("cpu", thresholds.cpu),
            ("memory", thresholds.memory),
            ("disk", thresholds.disk),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(DomainError::ValidationError(format!(
                    "monitoring.alert_thresholds.{} out of range (0-100): {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = ToolkitConfig::default();
        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, 22);
        assert_eq!(config.server.username, "root");
        assert_eq!(config.server.timeout, 30);
        assert_eq!(config.testing.performance_duration, 300);
        assert_eq!(config.testing.load_test_users, 100);
        assert_eq!(config.testing.stress_test_duration, 600);
        assert_eq!(config.monitoring.check_interval, 60);
        assert_eq!(config.monitoring.alert_thresholds.cpu, 80.0);
        assert_eq!(config.monitoring.alert_thresholds.memory, 85.0);
        assert_eq!(config.monitoring.alert_thresholds.disk, 90.0);
        assert_eq!(config.network.scan_subnet, "192.168.1.0/24");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_is_completed_from_defaults() {
        let json = r#"{ "server": { "host": "db01", "port": 2222 } }"#;
        let config: ToolkitConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.server.host, "db01");
        assert_eq!(config.server.port, 2222);
        assert_eq!(config.server.timeout, 30);
        assert_eq!(config.monitoring.alert_thresholds.disk, 90.0);
        assert_eq!(config.network.gateway, "192.168.1.1");
    }

    #[test]
    fn test_integer_thresholds_are_accepted() {
        let json = r#"{ "monitoring": { "alert_thresholds": { "cpu": 75 } } }"#;
        let config: ToolkitConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.monitoring.alert_thresholds.cpu, 75.0);
        assert_eq!(config.monitoring.alert_thresholds.memory, 85.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ToolkitConfig::default();
        config.server.port = 0;
        assert!(config.validate().unwrap_err().to_string().contains("server.port"));

        let mut config = ToolkitConfig::default();
        config.monitoring.alert_thresholds.memory = 120.0;
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("out of range"));

        let mut config = ToolkitConfig::default();
        config.server.timeout = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_test_durations() {
        let mut config = ToolkitConfig::default();
        config.testing.performance_duration = u64::MAX - 10;
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("testing.performance_duration"));

        let mut config = ToolkitConfig::default();
        config.testing.stress_test_duration = MAX_TEST_DURATION_SECS + 1;
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("testing.stress_test_duration"));

        let mut config = ToolkitConfig::default();
        config.testing.stress_test_duration = MAX_TEST_DURATION_SECS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unique_services_keeps_first_occurrence() {
        let mut config = ToolkitConfig::default();
        config.monitoring.services = ["nginx", "ssh", " nginx ", "", "cron", "ssh"]
            .into_iter()
            .map(String::from)
            .collect();

        assert_eq!(config.monitoring.unique_services(), vec!["nginx", "ssh", "cron"]);
    }
}
