// Settings Service - validated configuration updates

use crate::domain::ToolkitConfig;
use crate::error::Result;
use crate::port::ConfigStore;
use std::sync::Arc;
use tracing::info;

/// Loads, validates and persists the toolkit configuration
pub struct SettingsService {
    config_store: Arc<dyn ConfigStore>,
}

impl SettingsService {
    pub fn new(config_store: Arc<dyn ConfigStore>) -> Self {
        Self { config_store }
    }

    /// Current configuration (defaults on missing or malformed file)
    pub async fn load(&self) -> ToolkitConfig {
        self.config_store.load().await
    }

    /// Validate and save an edited configuration
    ///
    /// # Errors
    /// - AppError::Domain if a value is out of range; nothing is saved
    pub async fn apply(&self, config: ToolkitConfig) -> Result<ToolkitConfig> {
        config.validate()?;
        self.config_store.save(&config).await?;
        info!(path = %self.config_store.location().display(), "Configuration saved");
        Ok(config)
    }

    /// Replace the configuration with defaults and save it
    pub async fn reset(&self) -> Result<ToolkitConfig> {
        let config = ToolkitConfig::default();
        self.config_store.save(&config).await?;
        info!(path = %self.config_store.location().display(), "Configuration reset to defaults");
        Ok(config)
    }

    pub fn location(&self) -> &std::path::Path {
        self.config_store.location()
    }
}
