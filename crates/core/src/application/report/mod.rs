//! Report Service - turns stored result artifacts into documents
//!
//! Reports only count `success` flags and embed raw output; command output
//! itself is never parsed.

mod render;

pub use render::{escape_html, render_html, render_text};

use super::constants::{EXPORT_PREFIX, TEST_REPORT_PREFIX, TEST_SUMMARY_PREFIX};
use crate::domain::CheckKind;
use crate::error::{AppError, Result};
use crate::port::artifact_store::to_pretty_json;
use crate::port::{ArtifactStore, StoredArtifact, TimeProvider};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Pass/fail counts for one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSummary {
    pub file_name: String,
    /// Suite title, or the raw file prefix for non-suite artifacts
    pub suite: String,
    pub passed: usize,
    pub failed: usize,
}

impl ArtifactSummary {
    pub fn from_artifact(artifact: &StoredArtifact) -> Self {
        let results = artifact.check_results();
        let passed = results.iter().filter(|(_, r)| r.succeeded()).count();
        let suite = artifact
            .kind()
            .map(|k| k.title().to_string())
            .unwrap_or_else(|| artifact.prefix().to_string());

        Self {
            file_name: artifact.file_name.clone(),
            suite,
            passed,
            failed: results.len() - passed,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }
}

/// Per-artifact counts plus totals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutiveSummary {
    pub rows: Vec<ArtifactSummary>,
}

impl ExecutiveSummary {
    pub fn from_artifacts(artifacts: &[StoredArtifact]) -> Self {
        Self {
            rows: artifacts.iter().map(ArtifactSummary::from_artifact).collect(),
        }
    }

    pub fn total_passed(&self) -> usize {
        self.rows.iter().map(|r| r.passed).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.rows.iter().map(|r| r.failed).sum()
    }

    pub fn total_checks(&self) -> usize {
        self.total_passed() + self.total_failed()
    }
}

/// Pass rate of one suite kind across all stored runs
#[derive(Debug, Clone, PartialEq)]
pub struct TrendRow {
    pub kind: CheckKind,
    pub runs: usize,
    pub passed: usize,
    pub total: usize,
    pub first_stamp: String,
    pub last_stamp: String,
    /// Pass rate of the most recent run (percent)
    pub last_pass_rate: f64,
}

impl TrendRow {
    /// Pass rate over every run (percent)
    pub fn pass_rate(&self) -> f64 {
        rate(self.passed, self.total)
    }
}

fn rate(passed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        passed as f64 / total as f64 * 100.0
    }
}

/// Paths of a generated test report
#[derive(Debug, Clone)]
pub struct TestReport {
    pub html_path: PathBuf,
    pub summary_path: PathBuf,
    pub artifact_count: usize,
}

/// Path of an export bundle
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub artifact_count: usize,
}

/// Report Service
pub struct ReportService {
    artifact_store: Arc<dyn ArtifactStore>,
    time_provider: Arc<dyn TimeProvider>,
}

impl ReportService {
    pub fn new(artifact_store: Arc<dyn ArtifactStore>, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            artifact_store,
            time_provider,
        }
    }

    async fn load_non_empty(&self) -> Result<Vec<StoredArtifact>> {
        let artifacts = self.artifact_store.load_results().await?;
        if artifacts.is_empty() {
            return Err(AppError::NotFound(
                "no result artifacts found; run a suite first".to_string(),
            ));
        }
        Ok(artifacts)
    }

    /// Write `test_report_{stamp}.html` and `test_summary_{stamp}.txt`
    /// covering every stored result artifact
    ///
    /// # Errors
    /// - AppError::NotFound if there are no result artifacts
    pub async fn generate_test_report(&self) -> Result<TestReport> {
        let artifacts = self.load_non_empty().await?;
        let summary = ExecutiveSummary::from_artifacts(&artifacts);

        let now = self.time_provider.now();
        let generated = now.format("%Y-%m-%d %H:%M:%S").to_string();
        let stamp = self.time_provider.artifact_stamp();

        let html = render_html(&generated, &artifacts, &summary);
        let text = render_text(&generated, &artifacts, &summary);

        let html_path = self
            .artifact_store
            .write_report(&format!("{}_{}.html", TEST_REPORT_PREFIX, stamp), &html)
            .await?;
        let summary_path = self
            .artifact_store
            .write_report(&format!("{}_{}.txt", TEST_SUMMARY_PREFIX, stamp), &text)
            .await?;

        info!(
            artifacts = artifacts.len(),
            html = %html_path.display(),
            summary = %summary_path.display(),
            "Test report generated"
        );

        Ok(TestReport {
            html_path,
            summary_path,
            artifact_count: artifacts.len(),
        })
    }

    /// Pass/fail counts per stored artifact
    pub async fn executive_summary(&self) -> Result<ExecutiveSummary> {
        let artifacts = self.artifact_store.load_results().await?;
        Ok(ExecutiveSummary::from_artifacts(&artifacts))
    }

    /// Pass rate per suite kind, oldest run to newest
    pub async fn trend_analysis(&self) -> Result<Vec<TrendRow>> {
        let artifacts = self.artifact_store.load_results().await?;
        let mut rows: BTreeMap<CheckKind, TrendRow> = BTreeMap::new();

        for artifact in &artifacts {
            let Some(kind) = artifact.kind() else {
                continue;
            };
            let summary = ArtifactSummary::from_artifact(artifact);
            let stamp = artifact.stamp().unwrap_or_default().to_string();

            let row = rows.entry(kind).or_insert_with(|| TrendRow {
                kind,
                runs: 0,
                passed: 0,
                total: 0,
                first_stamp: stamp.clone(),
                last_stamp: stamp.clone(),
                last_pass_rate: 0.0,
            });
            row.runs += 1;
            row.passed += summary.passed;
            row.total += summary.total();
            row.last_stamp = stamp;
            row.last_pass_rate = rate(summary.passed, summary.total());
        }

        Ok(rows.into_values().collect())
    }

    /// Bundle every result artifact into `export_{stamp}.json`
    ///
    /// # Errors
    /// - AppError::NotFound if there are no result artifacts
    pub async fn export_results(&self) -> Result<ExportOutcome> {
        let artifacts = self.load_non_empty().await?;

        let bundle: serde_json::Map<String, serde_json::Value> = artifacts
            .iter()
            .map(|a| (a.file_name.clone(), a.contents.clone()))
            .collect();
        let text = to_pretty_json(&bundle)?;

        let stamp = self.time_provider.artifact_stamp();
        let path = self
            .artifact_store
            .write_report(&format!("{}_{}.json", EXPORT_PREFIX, stamp), &text)
            .await?;

        info!(artifacts = artifacts.len(), path = %path.display(), "Results exported");

        Ok(ExportOutcome {
            path,
            artifact_count: artifacts.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::artifact_store::mocks::InMemoryArtifactStore;
    use crate::port::time_provider::FixedTimeProvider;
    use chrono::{Local, TimeZone};
    use serde_json::json;

    fn service(store: &InMemoryArtifactStore) -> ReportService {
        let instant = Local.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        ReportService::new(
            Arc::new(store.clone()),
            Arc::new(FixedTimeProvider::new(instant)),
        )
    }

    fn entry(command: &str, code: i32, stderr: &str) -> serde_json::Value {
        json!({
            "command": command,
            "success": code == 0,
            "stdout": "",
            "stderr": stderr,
            "returncode": code
        })
    }

    fn seeded_store() -> InMemoryArtifactStore {
        let store = InMemoryArtifactStore::new();
        store.insert_result(
            "health_check_20240101_100000.json",
            json!({ "Uptime": entry("uptime -p", 0, ""), "CPU Usage": entry("top", 1, "top: not permitted") }),
        );
        store.insert_result(
            "health_check_20240102_100000.json",
            json!({ "Uptime": entry("uptime -p", 0, ""), "CPU Usage": entry("top", 0, "") }),
        );
        store.insert_result(
            "security_scan_20240101_120000.json",
            json!({ "Firewall": entry("ufw status", 1, "<denied>") }),
        );
        store
    }

    #[tokio::test]
    async fn test_generate_report_writes_html_and_text() {
        let store = seeded_store();
        let report = service(&store).generate_test_report().await.unwrap();

        assert_eq!(report.artifact_count, 3);
        assert!(report.html_path.ends_with("test_report_20240501_080000.html"));
        assert!(report.summary_path.ends_with("test_summary_20240501_080000.txt"));

        let html = store.report("test_report_20240501_080000.html").unwrap();
        assert!(html.contains("health_check_20240101_100000.json"));
        assert!(html.contains("security_scan_20240101_120000.json"));
        // Embedded JSON is escaped
        assert!(html.contains("&lt;denied&gt;"));
        assert!(!html.contains("<denied>"));

        let text = store.report("test_summary_20240501_080000.txt").unwrap();
        assert!(text.contains("FAILED CPU Usage: top: not permitted"));
        assert!(text.contains("TOTAL: 3 passed, 2 failed, 5 checks"));
    }

    #[tokio::test]
    async fn test_reports_require_artifacts() {
        let store = InMemoryArtifactStore::new();
        let service = service(&store);

        assert!(matches!(
            service.generate_test_report().await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.export_results().await,
            Err(AppError::NotFound(_))
        ));
        assert!(store.report_names().is_empty());
    }

    #[tokio::test]
    async fn test_executive_summary_counts() {
        let store = seeded_store();
        let summary = service(&store).executive_summary().await.unwrap();

        assert_eq!(summary.rows.len(), 3);
        assert_eq!(summary.total_passed(), 3);
        assert_eq!(summary.total_failed(), 2);
        assert_eq!(summary.rows[0].suite, "Server Health Check");
    }

    #[tokio::test]
    async fn test_trend_analysis_groups_by_kind() {
        let store = seeded_store();
        store.insert_result("monitoring_report_20240103_000000.json", json!({"metrics": {}}));

        let rows = service(&store).trend_analysis().await.unwrap();
        assert_eq!(rows.len(), 2);

        let health = rows.iter().find(|r| r.kind == CheckKind::HealthCheck).unwrap();
        assert_eq!(health.runs, 2);
        assert_eq!(health.passed, 3);
        assert_eq!(health.total, 4);
        assert_eq!(health.pass_rate(), 75.0);
        assert_eq!(health.last_pass_rate, 100.0);
        assert_eq!(health.first_stamp, "20240101_100000");
        assert_eq!(health.last_stamp, "20240102_100000");
    }

    #[tokio::test]
    async fn test_export_bundles_every_artifact() {
        let store = seeded_store();
        let outcome = service(&store).export_results().await.unwrap();

        assert_eq!(outcome.artifact_count, 3);
        let text = store.report("export_20240501_080000.json").unwrap();
        let bundle: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            bundle["security_scan_20240101_120000.json"]["Firewall"]["returncode"],
            1
        );
    }
}
