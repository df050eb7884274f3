// Port Layer - Interfaces for external dependencies

pub mod artifact_store;
pub mod command_runner;
pub mod config_store;
pub mod system_probe;
pub mod time_provider; // For deterministic testing

// Re-exports
pub use artifact_store::{ArtifactStore, StoredArtifact};
pub use command_runner::{CommandRunner, DEFAULT_TIMEOUT_SECS};
pub use config_store::ConfigStore;
pub use system_probe::{SystemMetrics, SystemProbe};
pub use time_provider::TimeProvider;
