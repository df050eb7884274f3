// JSON file ConfigStore Implementation

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use toolkit_core::domain::ToolkitConfig;
use toolkit_core::error::Result;
use toolkit_core::port::artifact_store::to_pretty_json;
use toolkit_core::port::ConfigStore;
use tracing::{info, warn};

pub const DEFAULT_CONFIG_FILE: &str = "toolkit_config.json";

/// Configuration stored as a single JSON document
///
/// Missing sections and keys take their defaults, so hand-written partial
/// files keep working.
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn write_defaults(&self) -> ToolkitConfig {
        let config = ToolkitConfig::default();
        match self.save(&config).await {
            Ok(()) => info!(path = %self.path.display(), "Created default configuration file"),
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Could not write default configuration file"
            ),
        }
        config
    }
}

impl Default for JsonConfigStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_FILE)
    }
}

#[async_trait]
impl ConfigStore for JsonConfigStore {
    async fn load(&self) -> ToolkitConfig {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return self.write_defaults().await,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not read configuration, using defaults");
                return ToolkitConfig::default();
            }
        };

        let config = match serde_json::from_str::<ToolkitConfig>(&text) {
            Ok(config) => config,
            Err(e) => {
                // The file is left untouched so the operator can fix it
                warn!(path = %self.path.display(), error = %e, "Malformed configuration, using defaults");
                return ToolkitConfig::default();
            }
        };

        if let Err(e) = config.validate() {
            warn!(path = %self.path.display(), error = %e, "Configuration has out-of-range values");
        }
        info!(path = %self.path.display(), "Configuration loaded");
        config
    }

    async fn save(&self, config: &ToolkitConfig) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let body = to_pretty_json(config)?;
        tokio::fs::write(&self.path, body).await?;
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}
