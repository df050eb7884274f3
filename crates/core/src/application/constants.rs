// Application constants (no magic values)

use crate::domain::CheckKind;

/// Suites executed by "Run Full Test Suite", in order
pub const FULL_SUITE: [CheckKind; 4] = [
    CheckKind::HealthCheck,
    CheckKind::PerformanceBenchmark,
    CheckKind::NetworkConnectivity,
    CheckKind::SecurityScan,
];

/// Benchmarks run far longer than inspection commands (5 minutes)
pub const BENCHMARK_TIMEOUT_SECS: u64 = 300;

/// Package manager operations (10 minutes)
pub const PACKAGE_INSTALL_TIMEOUT_SECS: u64 = 600;

/// Ping sweep of a /24 with nmap (2 minutes)
pub const SUBNET_SCAN_TIMEOUT_SECS: u64 = 120;

/// Filesystem walks in the security scan (2 minutes)
pub const FILESYSTEM_SCAN_TIMEOUT_SECS: u64 = 120;

/// Extra time granted to tools that run for a configured duration
pub const DURATION_GRACE_SECS: u64 = 60;

/// Requests issued per simulated user by the load test
pub const LOAD_TEST_REQUESTS_PER_USER: u64 = 10;

/// Monitoring snapshot artifact prefix
pub const MONITORING_REPORT_PREFIX: &str = "monitoring_report";

/// Report file prefixes (written to the reports directory)
pub const TEST_REPORT_PREFIX: &str = "test_report";
pub const TEST_SUMMARY_PREFIX: &str = "test_summary";
pub const EXPORT_PREFIX: &str = "export";

/// Build script prefix (written to the scripts directory)
pub const BUILD_SCRIPT_PREFIX: &str = "build";
