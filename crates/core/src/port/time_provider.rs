// Time Provider Port (for testability)

use chrono::{DateTime, Local};

/// Format used in artifact file names (`health_check_20240131_235959.json`)
pub const ARTIFACT_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Time provider interface (allows mocking in tests)
pub trait TimeProvider: Send + Sync {
    /// Current local wall-clock time
    fn now(&self) -> DateTime<Local>;

    /// Get current time in milliseconds since epoch
    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }

    /// Timestamp component for artifact file names
    fn artifact_stamp(&self) -> String {
        self.now().format(ARTIFACT_STAMP_FORMAT).to_string()
    }
}

/// System time provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Frozen clock for deterministic tests
pub struct FixedTimeProvider {
    instant: DateTime<Local>,
}

impl FixedTimeProvider {
    pub fn new(instant: DateTime<Local>) -> Self {
        Self { instant }
    }
}

impl TimeProvider for FixedTimeProvider {
    fn now(&self) -> DateTime<Local> {
        self.instant
    }
}
