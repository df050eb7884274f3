// Build script generation - a reviewable shell script for server setup

use super::catalog::{install_packages_command, shell_quote};
use super::constants::BUILD_SCRIPT_PREFIX;
use crate::domain::ToolkitConfig;
use crate::error::Result;
use crate::port::{ArtifactStore, TimeProvider};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Render the setup script for `config`
///
/// Installs the configured packages, enables the monitored services and
/// prints the resulting network state. Nothing is executed here.
pub fn render_build_script(config: &ToolkitConfig, generated: &str) -> String {
    let packages = config
        .build
        .packages
        .iter()
        .map(|p| shell_quote(p))
        .collect::<Vec<_>>()
        .join(" ");

    let mut script = String::new();
    script.push_str("#!/bin/sh\n");
    script.push_str(&format!("# Server build script generated {}\n", generated));
    script.push_str(&format!(
        "# Target: {}@{}:{}\n",
        config.server.username, config.server.host, config.server.port
    ));
    script.push_str("set -eu\n\n");

    script.push_str("echo '==> Installing packages'\n");
    if packages.is_empty() {
        script.push_str("echo 'no packages configured'\n");
    } else {
        script.push_str(&install_packages_command(&packages));
        script.push('\n');
    }

    script.push_str("\necho '==> Enabling services'\n");
    for service in config.monitoring.unique_services() {
        let quoted = shell_quote(service);
        script.push_str(&format!(
            "systemctl enable --now {q} || echo 'warning: could not enable' {q} >&2\n",
            q = quoted
        ));
    }

    script.push_str("\necho '==> Network configuration'\n");
    script.push_str("ip -br addr\n");
    script.push_str("ip route show\n");
    script.push_str("\necho '==> Build complete'\n");
    script
}

/// Writes generated build scripts to the scripts directory
pub struct BuildScriptGenerator {
    artifact_store: Arc<dyn ArtifactStore>,
    time_provider: Arc<dyn TimeProvider>,
}

impl BuildScriptGenerator {
    pub fn new(artifact_store: Arc<dyn ArtifactStore>, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            artifact_store,
            time_provider,
        }
    }

    /// Write `build_{stamp}.sh`
    pub async fn generate(&self, config: &ToolkitConfig) -> Result<PathBuf> {
        let generated = self.time_provider.now().format("%Y-%m-%d %H:%M:%S").to_string();
        let script = render_build_script(config, &generated);
        let file_name = format!("{}_{}.sh", BUILD_SCRIPT_PREFIX, self.time_provider.artifact_stamp());

        let path = self.artifact_store.write_script(&file_name, &script).await?;
        info!(path = %path.display(), "Build script generated");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::artifact_store::mocks::InMemoryArtifactStore;
    use crate::port::time_provider::FixedTimeProvider;
    use chrono::{Local, TimeZone};

    #[test]
    fn test_script_contents() {
        let mut config = ToolkitConfig::default();
        config.monitoring.services = vec!["nginx".to_string()];
        config.build.packages = vec!["htop".to_string()];

        let script = render_build_script(&config, "2024-01-01 00:00:00");
        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains("set -eu"));
        assert!(script.contains("apt-get install -y htop"));
        assert!(script.contains("systemctl enable --now nginx"));
        assert!(script.contains("# Target: root@localhost:22"));
    }

    #[test]
    fn test_script_without_packages() {
        let mut config = ToolkitConfig::default();
        config.build.packages.clear();

        let script = render_build_script(&config, "now");
        assert!(script.contains("no packages configured"));
        assert!(!script.contains("apt-get"));
    }

    #[tokio::test]
    async fn test_generate_writes_script() {
        let store = InMemoryArtifactStore::new();
        let instant = Local.with_ymd_and_hms(2024, 2, 2, 2, 2, 2).unwrap();
        let generator = BuildScriptGenerator::new(
            Arc::new(store.clone()),
            Arc::new(FixedTimeProvider::new(instant)),
        );

        let path = generator.generate(&ToolkitConfig::default()).await.unwrap();
        assert!(path.ends_with("build_20240202_020202.sh"));
        assert!(store
            .script("build_20240202_020202.sh")
            .unwrap()
            .contains("# Server build script generated 2024-02-02 02:02:02"));
    }
}
