// Server Toolkit Infrastructure - Filesystem Adapter
// Implements: ConfigStore, ArtifactStore

mod artifact_store;
mod config_store;
mod paths;

pub use artifact_store::FsArtifactStore;
pub use config_store::{JsonConfigStore, DEFAULT_CONFIG_FILE};
pub use paths::{WorkspacePaths, DEFAULT_REPORTS_DIR, DEFAULT_RESULTS_DIR, DEFAULT_SCRIPTS_DIR};
