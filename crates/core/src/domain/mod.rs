// Domain Layer - Pure data types and invariants

pub mod check;
pub mod command_result;
pub mod config;
pub mod error;

// Re-exports
pub use check::{Check, CheckKind, CheckRecord, ResultSet};
pub use command_result::{CommandResult, SENTINEL_EXIT_STATUS};
pub use config::{
    AlertThresholds, BuildSettings, MonitoringSettings, NetworkSettings, ServerSettings,
    TestingSettings, ToolkitConfig,
};
pub use error::DomainError;
