//! Check catalog - the static command list behind every suite
//!
//! Commands are literal strings interpreted by the host shell. Values taken
//! from the configuration are quoted with [`shell_quote`] before being
//! interpolated.

use super::constants::*;
use crate::domain::{Check, CheckKind, ToolkitConfig};

impl CheckKind {
    /// Commands executed for this kind, in run order
    pub fn checks(&self, config: &ToolkitConfig) -> Vec<Check> {
        match self {
            CheckKind::ConfigValidation => config_validation(),
            CheckKind::HealthCheck => health_check(),
            CheckKind::PerformanceBenchmark => performance_benchmark(config),
            CheckKind::LoadTest => load_test(config),
            CheckKind::StressTest => stress_test(config),
            CheckKind::NetworkConnectivity => network_connectivity(config),
            CheckKind::SecurityScan => security_scan(),
            CheckKind::CompatibilityTest => compatibility_test(),
            CheckKind::PackageInstall => package_install(config),
            CheckKind::ServiceConfiguration => service_configuration(config),
            CheckKind::NetworkConfiguration => network_configuration(),
            CheckKind::OsInstallation => os_installation(config),
            CheckKind::ServiceAvailability => service_availability(config),
            CheckKind::PerformanceMonitoring => performance_monitoring(),
            CheckKind::LogAnalysis => log_analysis(),
        }
    }
}

/// Quote a value for safe interpolation into a POSIX shell command
pub fn shell_quote(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:@%+=,".contains(c));

    if plain {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

fn config_validation() -> Vec<Check> {
    vec![
        Check::new("System Information", "uname -a"),
        Check::new("CPU Information", "lscpu"),
        Check::new("Memory Information", "free -h"),
        Check::new("Disk Information", "df -h"),
        Check::new("Network Interfaces", "ip addr show"),
        Check::new(
            "Running Services",
            "systemctl list-units --type=service --state=running --no-pager",
        ),
        Check::new("Open Ports", "ss -tuln"),
        Check::new("System Load", "uptime"),
    ]
}

fn health_check() -> Vec<Check> {
    vec![
        Check::new(
            "CPU Usage",
            "top -bn1 | grep 'Cpu(s)' | awk '{print $2}' | cut -d'%' -f1",
        ),
        Check::new(
            "Memory Usage",
            r#"free | grep Mem | awk '{printf "%.1f", $3/$2 * 100.0}'"#,
        ),
        Check::new(
            "Disk Usage",
            r#"df -h | awk '$NF=="/"{printf "%s", $5}'"#,
        ),
        Check::new(
            "Load Average",
            "uptime | awk -F'load average:' '{print $2}'",
        ),
        Check::new("Uptime", "uptime -p"),
        Check::new("Active Connections", "ss -tuln | wc -l"),
        Check::new(
            "Zombie Processes",
            "ps aux | awk '$8 ~ /^Z/ { print $2 }' | wc -l",
        ),
    ]
}

fn performance_benchmark(config: &ToolkitConfig) -> Vec<Check> {
    let host = shell_quote(&config.server.host);
    vec![
        Check::new("CPU Benchmark", "sysbench cpu --cpu-max-prime=20000 run")
            .with_timeout(BENCHMARK_TIMEOUT_SECS),
        Check::new(
            "Memory Benchmark",
            "sysbench memory --memory-total-size=1G run",
        )
        .with_timeout(BENCHMARK_TIMEOUT_SECS),
        Check::new(
            "Disk I/O Benchmark",
            "sysbench fileio --file-total-size=1G --file-test-mode=rndrw run",
        )
        .with_timeout(BENCHMARK_TIMEOUT_SECS),
        Check::new("Network Speed Test", format!("iperf3 -c {} -t 10", host))
            .with_timeout(BENCHMARK_TIMEOUT_SECS),
    ]
}

fn load_test(config: &ToolkitConfig) -> Vec<Check> {
    let users = u64::from(config.testing.load_test_users.max(1));
    let requests = users * LOAD_TEST_REQUESTS_PER_USER;
    let url = shell_quote(&format!("http://{}/", config.server.host));

    vec![Check::new(
        "HTTP Load Test",
        format!("ab -n {} -c {} {}", requests, users, url),
    )
    .with_timeout(
        config
            .testing
            .performance_duration
            .saturating_add(DURATION_GRACE_SECS),
    )]
}

fn stress_test(config: &ToolkitConfig) -> Vec<Check> {
    let duration = config.testing.stress_test_duration;
    vec![Check::new(
        "CPU and Memory Stress",
        format!(
            "stress-ng --cpu 0 --vm 1 --vm-bytes 50% --timeout {}s --metrics-brief",
            duration
        ),
    )
    .with_timeout(duration.saturating_add(DURATION_GRACE_SECS))]
}

fn network_connectivity(config: &ToolkitConfig) -> Vec<Check> {
    let network = &config.network;
    vec![
        Check::new("Loopback", "ping -c 3 127.0.0.1"),
        Check::new("Default Route", "ip route show default"),
        Check::new(
            "Default Gateway",
            format!("ping -c 3 -W 2 {}", shell_quote(&network.gateway)),
        ),
        Check::new(
            "External Host",
            format!("ping -c 3 -W 2 {}", shell_quote(&network.external_host)),
        ),
        Check::new(
            "DNS Resolution",
            format!("getent hosts {}", shell_quote(&network.dns_probe_host)),
        ),
        Check::new(
            "Server Port",
            format!(
                "nc -z -w 5 {} {}",
                shell_quote(&config.server.host),
                config.server.port
            ),
        ),
        Check::new(
            "Subnet Sweep",
            format!("nmap -sn {}", shell_quote(&network.scan_subnet)),
        )
        .with_timeout(SUBNET_SCAN_TIMEOUT_SECS),
    ]
}

fn security_scan() -> Vec<Check> {
    vec![
        Check::new("Listening Ports", "ss -tulnp"),
        Check::new(
            "Failed Login Attempts",
            "lastb -n 20 2>/dev/null || journalctl _COMM=sshd --no-pager -n 200 | grep -i 'failed password' | tail -n 20",
        ),
        Check::new(
            "SUID Binaries",
            "find / -xdev -perm -4000 -type f 2>/dev/null",
        )
        .with_timeout(FILESYSTEM_SCAN_TIMEOUT_SECS),
        Check::new(
            "World-Writable Files in /etc",
            "find /etc -xdev -type f -perm -0002 2>/dev/null",
        )
        .with_timeout(FILESYSTEM_SCAN_TIMEOUT_SECS),
        Check::new(
            "Firewall Status",
            "ufw status verbose 2>/dev/null || iptables -L -n",
        ),
        Check::new(
            "SSH Root Login",
            r"grep -Ei '^\s*PermitRootLogin' /etc/ssh/sshd_config",
        ),
        Check::new(
            "Accounts Without Password",
            r#"awk -F: '($2 == "") {print $1}' /etc/shadow"#,
        ),
    ]
}

fn compatibility_test() -> Vec<Check> {
    vec![
        Check::new("OS Release", "cat /etc/os-release"),
        Check::new("Kernel Version", "uname -r"),
        Check::new("Architecture", "uname -m"),
        Check::new("C Library", "ldd --version | head -n 1"),
        Check::new("Virtualization", "systemd-detect-virt"),
        Check::new(
            "CPU Virtualization Flags",
            "grep -m1 -oE 'vmx|svm' /proc/cpuinfo",
        ),
        Check::new("Init System", "ps -p 1 -o comm="),
    ]
}

fn package_install(config: &ToolkitConfig) -> Vec<Check> {
    let packages = config
        .build
        .packages
        .iter()
        .map(|p| shell_quote(p))
        .collect::<Vec<_>>()
        .join(" ");

    vec![
        Check::new(
            "Package Manager",
            "command -v apt-get || command -v dnf || command -v yum || command -v zypper",
        ),
        Check::new("Install Packages", install_packages_command(&packages))
            .with_timeout(PACKAGE_INSTALL_TIMEOUT_SECS),
    ]
}

/// Package installation through whichever package manager is present
pub(crate) fn install_packages_command(packages: &str) -> String {
    format!(
        "if command -v apt-get >/dev/null 2>&1; then apt-get update && apt-get install -y {p}; \
         elif command -v dnf >/dev/null 2>&1; then dnf install -y {p}; \
         elif command -v yum >/dev/null 2>&1; then yum install -y {p}; \
         elif command -v zypper >/dev/null 2>&1; then zypper --non-interactive install {p}; \
         else echo 'no supported package manager found' >&2; exit 1; fi",
        p = packages
    )
}

fn service_configuration(config: &ToolkitConfig) -> Vec<Check> {
    let mut checks = vec![
        Check::new(
            "Enabled Services",
            "systemctl list-unit-files --type=service --state=enabled --no-pager",
        ),
        Check::new("Failed Services", "systemctl --failed --no-pager"),
        Check::new("Default Target", "systemctl get-default"),
    ];

    checks.extend(config.monitoring.unique_services().into_iter().map(|service| {
        Check::new(
            format!("{} enabled", service),
            format!("systemctl is-enabled {}", shell_quote(service)),
        )
    }));

    checks
}

fn network_configuration() -> Vec<Check> {
    vec![
        Check::new("Interfaces", "ip -br addr"),
        Check::new("Routing Table", "ip route show"),
        Check::new("DNS Resolvers", "cat /etc/resolv.conf"),
        Check::new("Hostname", "hostname -f"),
        Check::new("Socket Summary", "ss -s"),
    ]
}

fn os_installation(config: &ToolkitConfig) -> Vec<Check> {
    let script = &config.build.os_install_script;
    vec![Check::new(
        format!("OS Installation ({})", script),
        format!("sh {}", shell_quote(script)),
    )
    .with_timeout(PACKAGE_INSTALL_TIMEOUT_SECS)]
}

fn service_availability(config: &ToolkitConfig) -> Vec<Check> {
    config
        .monitoring
        .unique_services()
        .into_iter()
        .map(|service| {
            Check::new(
                format!("{} service", service),
                format!("systemctl is-active {}", shell_quote(service)),
            )
        })
        .collect()
}

fn performance_monitoring() -> Vec<Check> {
    vec![
        Check::new("Virtual Memory Statistics", "vmstat 1 5"),
        Check::new("Disk I/O Statistics", "iostat -x 1 3"),
        Check::new("Per-CPU Utilization", "mpstat -P ALL 1 3"),
        Check::new("Memory Summary", "free -m"),
        Check::new(
            "Top CPU Processes",
            "ps aux --sort=-%cpu | head -n 15",
        ),
        Check::new(
            "Top Memory Processes",
            "ps aux --sort=-%mem | head -n 15",
        ),
    ]
}

fn log_analysis() -> Vec<Check> {
    vec![
        Check::new("Recent Errors", "journalctl -p err -n 50 --no-pager"),
        Check::new(
            "Kernel Warnings",
            "dmesg --level=err,warn | tail -n 50",
        ),
        Check::new("Syslog Error Count", "grep -ci 'error' /var/log/syslog"),
        Check::new(
            "Failed SSH Passwords",
            "grep -c 'Failed password' /var/log/auth.log",
        ),
        Check::new("Journal Disk Usage", "journalctl --disk-usage"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_well_formed_checks() {
        let config = ToolkitConfig::default();
        for kind in CheckKind::ALL {
            let checks = kind.checks(&config);
            assert!(!checks.is_empty(), "{} has no checks", kind.slug());

            for check in &checks {
                assert!(!check.label.trim().is_empty());
                assert!(!check.command.trim().is_empty());
            }

            // Labels key the artifact JSON object, so they must be unique
            let mut labels: Vec<&str> = checks.iter().map(|c| c.label.as_str()).collect();
            labels.sort_unstable();
            labels.dedup();
            assert_eq!(labels.len(), checks.len(), "duplicate label in {}", kind.slug());
        }
    }

    #[test]
    fn test_connectivity_uses_configured_network() {
        let mut config = ToolkitConfig::default();
        config.network.gateway = "10.0.0.1".to_string();
        config.network.scan_subnet = "10.0.0.0/16".to_string();

        let checks = CheckKind::NetworkConnectivity.checks(&config);
        let commands: Vec<&str> = checks.iter().map(|c| c.command.as_str()).collect();

        assert!(commands.contains(&"ping -c 3 -W 2 10.0.0.1"));
        assert!(commands.contains(&"nmap -sn 10.0.0.0/16"));
        assert!(!commands.iter().any(|c| c.contains("192.168.1")));
    }

    #[test]
    fn test_health_check_preserves_labels_and_order() {
        let labels: Vec<String> = CheckKind::HealthCheck
            .checks(&ToolkitConfig::default())
            .into_iter()
            .map(|c| c.label)
            .collect();

        assert_eq!(
            labels,
            vec![
                "CPU Usage",
                "Memory Usage",
                "Disk Usage",
                "Load Average",
                "Uptime",
                "Active Connections",
                "Zombie Processes"
            ]
        );
    }

    #[test]
    fn test_duration_driven_timeouts() {
        let mut config = ToolkitConfig::default();
        config.testing.stress_test_duration = 120;
        config.testing.load_test_users = 5;

        let stress = CheckKind::StressTest.checks(&config);
        assert!(stress[0].command.contains("--timeout 120s"));
        assert_eq!(stress[0].timeout_secs, Some(120 + DURATION_GRACE_SECS));

        let load = CheckKind::LoadTest.checks(&config);
        assert!(load[0].command.starts_with("ab -n 50 -c 5 "));
    }

    #[test]
    fn test_service_checks_follow_config() {
        let mut config = ToolkitConfig::default();
        config.monitoring.services = vec!["nginx".to_string(), "my service".to_string()];

        let checks = CheckKind::ServiceAvailability.checks(&config);
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].command, "systemctl is-active nginx");
        assert_eq!(checks[1].command, "systemctl is-active 'my service'");
    }

    #[test]
    fn test_oversized_durations_do_not_overflow() {
        let mut config = ToolkitConfig::default();
        config.testing.stress_test_duration = u64::MAX;
        config.testing.performance_duration = u64::MAX - 10;

        let stress = CheckKind::StressTest.checks(&config);
        assert_eq!(stress[0].timeout_secs, Some(u64::MAX));

        let load = CheckKind::LoadTest.checks(&config);
        assert_eq!(load[0].timeout_secs, Some(u64::MAX));
    }

    #[test]
    fn test_repeated_services_get_one_check() {
        let mut config = ToolkitConfig::default();
        config.monitoring.services = ["ssh", "nginx", "ssh", "  "]
            .into_iter()
            .map(String::from)
            .collect();

        let availability = CheckKind::ServiceAvailability.checks(&config);
        let labels: Vec<&str> = availability.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["ssh service", "nginx service"]);

        let configuration = CheckKind::ServiceConfiguration.checks(&config);
        assert_eq!(configuration.len(), 3 + 2);
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("192.168.1.0/24"), "192.168.1.0/24");
        assert_eq!(shell_quote("a b"), "'a b'");
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("x; rm -rf /"), "'x; rm -rf /'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }
}
