// Config Store Port - loading and saving the toolkit configuration

use crate::domain::ToolkitConfig;
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Configuration persistence
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load the configuration
    ///
    /// Never fails: a missing file yields defaults (which are then written
    /// out), an unreadable or malformed file yields defaults.
    async fn load(&self) -> ToolkitConfig;

    /// Persist the configuration
    async fn save(&self, config: &ToolkitConfig) -> Result<()>;

    /// Location shown to the operator
    fn location(&self) -> &Path;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    /// In-memory config store
    #[derive(Clone)]
    pub struct InMemoryConfigStore {
        config: Arc<Mutex<Option<ToolkitConfig>>>,
        location: PathBuf,
    }

    impl InMemoryConfigStore {
        pub fn new(config: Option<ToolkitConfig>) -> Self {
            Self {
                config: Arc::new(Mutex::new(config)),
                location: PathBuf::from("memory/toolkit_config.json"),
            }
        }

        pub fn stored(&self) -> Option<ToolkitConfig> {
            self.config.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }
    }

    #[async_trait]
    impl ConfigStore for InMemoryConfigStore {
        async fn load(&self) -> ToolkitConfig {
            let mut stored = self.config.lock().unwrap_or_else(|e| e.into_inner());
            stored.get_or_insert_with(ToolkitConfig::default).clone()
        }

        async fn save(&self, config: &ToolkitConfig) -> Result<()> {
            *self.config.lock().unwrap_or_else(|e| e.into_inner()) = Some(config.clone());
            Ok(())
        }

        fn location(&self) -> &Path {
            &self.location
        }
    }
}
