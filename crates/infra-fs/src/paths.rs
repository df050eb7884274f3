// Workspace directory layout

use std::path::{Path, PathBuf};

pub const DEFAULT_RESULTS_DIR: &str = "test_results";
pub const DEFAULT_REPORTS_DIR: &str = "reports";
pub const DEFAULT_SCRIPTS_DIR: &str = "scripts";

/// Directories the toolkit writes artifacts into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspacePaths {
    pub results_dir: PathBuf,
    pub reports_dir: PathBuf,
    pub scripts_dir: PathBuf,
}

impl WorkspacePaths {
    pub fn new(
        results_dir: impl Into<PathBuf>,
        reports_dir: impl Into<PathBuf>,
        scripts_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            results_dir: results_dir.into(),
            reports_dir: reports_dir.into(),
            scripts_dir: scripts_dir.into(),
        }
    }

    /// Default layout below `root`
    pub fn under(root: &Path) -> Self {
        Self::new(
            root.join(DEFAULT_RESULTS_DIR),
            root.join(DEFAULT_REPORTS_DIR),
            root.join(DEFAULT_SCRIPTS_DIR),
        )
    }
}

impl Default for WorkspacePaths {
    fn default() -> Self {
        Self::new(DEFAULT_RESULTS_DIR, DEFAULT_REPORTS_DIR, DEFAULT_SCRIPTS_DIR)
    }
}
