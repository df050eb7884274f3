// Filesystem ArtifactStore Implementation

use crate::WorkspacePaths;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use toolkit_core::error::Result;
use toolkit_core::port::artifact_store::to_pretty_json;
use toolkit_core::port::{ArtifactStore, StoredArtifact};
use tracing::{debug, warn};

#[cfg(unix)]
const SCRIPT_MODE: u32 = 0o755;

/// Artifacts as plain files in the workspace directories
pub struct FsArtifactStore {
    paths: WorkspacePaths,
}

impl FsArtifactStore {
    /// Open the store, creating the workspace directories if needed
    ///
    /// # Errors
    /// - AppError::Io if a directory cannot be created
    pub async fn open(paths: WorkspacePaths) -> Result<Self> {
        for dir in [&paths.results_dir, &paths.reports_dir, &paths.scripts_dir] {
            tokio::fs::create_dir_all(dir).await?;
        }
        debug!(
            results = %paths.results_dir.display(),
            reports = %paths.reports_dir.display(),
            scripts = %paths.scripts_dir.display(),
            "Artifact directories ready"
        );
        Ok(Self { paths })
    }

    pub fn paths(&self) -> &WorkspacePaths {
        &self.paths
    }

    async fn write_file(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(file_name);
        tokio::fs::write(&path, contents).await?;
        Ok(path)
    }

    async fn read_artifact(path: &Path) -> Option<StoredArtifact> {
        let file_name = path.file_name()?.to_str()?.to_string();
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable result file");
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(contents) => Some(StoredArtifact::new(file_name, contents)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping invalid result file");
                None
            }
        }
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn save_json(
        &self,
        prefix: &str,
        stamp: &str,
        body: &serde_json::Value,
    ) -> Result<PathBuf> {
        let file_name = format!("{}_{}.json", prefix, stamp);
        let path = Self::write_file(&self.paths.results_dir, &file_name, &to_pretty_json(body)?).await?;
        debug!(path = %path.display(), "Result artifact saved");
        Ok(path)
    }

    async fn load_results(&self) -> Result<Vec<StoredArtifact>> {
        let mut entries = match tokio::fs::read_dir(&self.paths.results_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut artifacts = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(artifact) = Self::read_artifact(&path).await {
                artifacts.push(artifact);
            }
        }

        artifacts.sort_by(|a, b| {
            a.stamp()
                .cmp(&b.stamp())
                .then_with(|| a.file_name.cmp(&b.file_name))
        });
        debug!(count = artifacts.len(), "Result artifacts loaded");
        Ok(artifacts)
    }

    async fn write_report(&self, file_name: &str, contents: &str) -> Result<PathBuf> {
        Self::write_file(&self.paths.reports_dir, file_name, contents).await
    }

    async fn write_script(&self, file_name: &str, contents: &str) -> Result<PathBuf> {
        let path = Self::write_file(&self.paths.scripts_dir, file_name, contents).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&path, std::fs::Permissions::from_mode(SCRIPT_MODE)).await?;
        }

        Ok(path)
    }
}
