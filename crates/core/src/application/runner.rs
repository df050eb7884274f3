// Suite Runner - executes check suites through the harness and persists them

use super::constants::FULL_SUITE;
use crate::domain::{Check, CheckKind, CheckRecord, ResultSet, ToolkitConfig};
use crate::error::{AppError, Result};
use crate::port::{ArtifactStore, CommandRunner, TimeProvider, DEFAULT_TIMEOUT_SECS};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Outcome of one persisted suite run
#[derive(Debug, Clone)]
pub struct SuiteOutcome {
    pub results: ResultSet,
    pub path: PathBuf,
    pub elapsed: Duration,
}

/// Outcome of the full test suite
#[derive(Debug, Clone)]
pub struct FullSuiteOutcome {
    pub suites: Vec<SuiteOutcome>,
    pub elapsed: Duration,
}

/// Runs checks sequentially; a failing check never stops the suite
pub struct SuiteRunner {
    command_runner: Arc<dyn CommandRunner>,
    artifact_store: Arc<dyn ArtifactStore>,
    time_provider: Arc<dyn TimeProvider>,
}

impl SuiteRunner {
    pub fn new(
        command_runner: Arc<dyn CommandRunner>,
        artifact_store: Arc<dyn ArtifactStore>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            command_runner,
            artifact_store,
            time_provider,
        }
    }

    /// Run the catalog suite for `kind` and save it as
    /// `{slug}_{YYYYMMDD_HHMMSS}.json`
    ///
    /// # Arguments
    /// * `on_record` - called after each check finishes (console progress)
    pub async fn run_suite<F>(
        &self,
        kind: CheckKind,
        config: &ToolkitConfig,
        on_record: F,
    ) -> Result<SuiteOutcome>
    where
        F: FnMut(&CheckRecord) + Send,
    {
        let checks = kind.checks(config);
        self.run_checks(kind, &checks, config.server.timeout, on_record)
            .await
    }

    /// Run an explicit list of checks under `kind` and save the result set
    ///
    /// # Errors
    /// - AppError::NotFound if `checks` is empty; nothing is saved
    pub async fn run_checks<F>(
        &self,
        kind: CheckKind,
        checks: &[Check],
        default_timeout_secs: u64,
        mut on_record: F,
    ) -> Result<SuiteOutcome>
    where
        F: FnMut(&CheckRecord) + Send,
    {
        if checks.is_empty() {
            return Err(AppError::NotFound(format!(
                "No checks configured for {}",
                kind.title()
            )));
        }

        let started = Instant::now();
        let default_timeout = if default_timeout_secs == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            default_timeout_secs
        };

        info!(
            suite = kind.slug(),
            checks = checks.len(),
            "Starting check suite"
        );

        let mut results = ResultSet::new(kind);
        for check in checks {
            let timeout_secs = check.timeout_secs.unwrap_or(default_timeout);
            debug!(
                suite = kind.slug(),
                label = %check.label,
                command = %check.command,
                timeout_secs,
                "Running check"
            );

            let result = self.command_runner.run(&check.command, timeout_secs).await;
            if !result.succeeded() {
                warn!(
                    suite = kind.slug(),
                    label = %check.label,
                    exit_status = result.exit_status(),
                    stderr = %result.stderr().trim(),
                    "Check failed"
                );
            }

            let record = CheckRecord {
                label: check.label.clone(),
                command: check.command.clone(),
                result,
            };
            on_record(&record);
            results.push(record);
        }

        let body = serde_json::to_value(&results)?;
        let stamp = self.time_provider.artifact_stamp();
        let path = self.artifact_store.save_json(kind.slug(), &stamp, &body).await?;
        let elapsed = started.elapsed();

        info!(
            suite = kind.slug(),
            passed = results.passed(),
            failed = results.failed(),
            elapsed_ms = elapsed.as_millis() as u64,
            path = %path.display(),
            "Check suite saved"
        );

        Ok(SuiteOutcome {
            results,
            path,
            elapsed,
        })
    }

    /// Run health check, benchmark, connectivity and security suites in order
    ///
    /// Each suite is saved independently; a save error aborts the remaining
    /// suites.
    pub async fn run_full_suite<F>(
        &self,
        config: &ToolkitConfig,
        mut on_record: F,
    ) -> Result<FullSuiteOutcome>
    where
        F: FnMut(CheckKind, &CheckRecord) + Send,
    {
        let started = Instant::now();
        let mut suites = Vec::with_capacity(FULL_SUITE.len());

        for kind in FULL_SUITE {
            let outcome = self
                .run_suite(kind, config, |record| on_record(kind, record))
                .await?;
            suites.push(outcome);
        }

        let elapsed = started.elapsed();
        info!(
            suites = suites.len(),
            elapsed_secs = elapsed.as_secs_f64(),
            "Full test suite completed"
        );

        Ok(FullSuiteOutcome { suites, elapsed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CommandResult;
    use crate::port::artifact_store::mocks::InMemoryArtifactStore;
    use crate::port::command_runner::mocks::ScriptedCommandRunner;
    use crate::port::time_provider::FixedTimeProvider;
    use chrono::{Local, TimeZone};

    fn fixed_clock() -> Arc<FixedTimeProvider> {
        let instant = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 30).unwrap();
        Arc::new(FixedTimeProvider::new(instant))
    }

    fn runner(
        commands: ScriptedCommandRunner,
        store: InMemoryArtifactStore,
    ) -> SuiteRunner {
        SuiteRunner::new(Arc::new(commands), Arc::new(store), fixed_clock())
    }

    #[tokio::test]
    async fn test_failures_do_not_abort_sequence() {
        let commands = ScriptedCommandRunner::new()
            .respond("first", CommandResult::completed(1, "", "bad"))
            .respond("second", CommandResult::timed_out(5))
            .respond("third", CommandResult::completed(0, "fine", ""));
        let store = InMemoryArtifactStore::new();
        let runner = runner(commands.clone(), store.clone());

        let checks = vec![
            Check::new("First", "first"),
            Check::new("Second", "second").with_timeout(5),
            Check::new("Third", "third"),
        ];

        let mut seen = Vec::new();
        let outcome = runner
            .run_checks(CheckKind::HealthCheck, &checks, 30, |r| {
                seen.push(r.label.clone())
            })
            .await
            .unwrap();

        assert_eq!(seen, vec!["First", "Second", "Third"]);
        assert_eq!(outcome.results.passed(), 1);
        assert_eq!(outcome.results.failed(), 2);

        // Per-check timeout overrides the default
        assert_eq!(
            commands.calls(),
            vec![
                ("first".to_string(), 30),
                ("second".to_string(), 5),
                ("third".to_string(), 30)
            ]
        );
    }

    #[tokio::test]
    async fn test_suite_is_saved_with_slug_and_stamp() {
        let store = InMemoryArtifactStore::new();
        let runner = runner(ScriptedCommandRunner::new(), store.clone());

        let outcome = runner
            .run_suite(CheckKind::ConfigValidation, &ToolkitConfig::default(), |_| {})
            .await
            .unwrap();

        let name = "config_validation_20240309_140530.json";
        assert!(outcome.path.ends_with(name));

        let saved = store.result(name).unwrap();
        assert_eq!(saved["System Information"]["command"], "uname -a");
        assert_eq!(saved["System Information"]["success"], true);
        assert_eq!(saved.as_object().unwrap().len(), outcome.results.len());
    }

    #[tokio::test]
    async fn test_default_timeout_comes_from_config() {
        let commands = ScriptedCommandRunner::new();
        let runner = runner(commands.clone(), InMemoryArtifactStore::new());

        let mut config = ToolkitConfig::default();
        config.server.timeout = 12;

        runner
            .run_suite(CheckKind::HealthCheck, &config, |_| {})
            .await
            .unwrap();

        assert!(commands.calls().iter().all(|(_, timeout)| *timeout == 12));
    }

    #[tokio::test]
    async fn test_zero_default_timeout_falls_back() {
        let commands = ScriptedCommandRunner::new();
        let runner = runner(commands.clone(), InMemoryArtifactStore::new());

        runner
            .run_checks(CheckKind::LogAnalysis, &[Check::new("x", "x")], 0, |_| {})
            .await
            .unwrap();

        assert_eq!(commands.calls()[0].1, DEFAULT_TIMEOUT_SECS);
    }

    #[tokio::test]
    async fn test_empty_service_list_saves_nothing() {
        let commands = ScriptedCommandRunner::new();
        let store = InMemoryArtifactStore::new();
        let runner = runner(commands.clone(), store.clone());

        let mut config = ToolkitConfig::default();
        config.monitoring.services.clear();

        let err = runner
            .run_suite(CheckKind::ServiceAvailability, &config, |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(commands.calls().is_empty());
        assert!(store.result_names().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_services_keep_every_record() {
        let store = InMemoryArtifactStore::new();
        let runner = runner(ScriptedCommandRunner::new(), store.clone());

        let mut config = ToolkitConfig::default();
        config.monitoring.services = ["ssh", "ssh", "cron"]
            .into_iter()
            .map(String::from)
            .collect();

        let outcome = runner
            .run_suite(CheckKind::ServiceAvailability, &config, |_| {})
            .await
            .unwrap();

        let saved = store
            .result("service_availability_20240309_140530.json")
            .unwrap();
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(saved.as_object().unwrap().len(), outcome.results.len());
    }

    #[tokio::test]
    async fn test_full_suite_runs_four_suites_in_order() {
        let store = InMemoryArtifactStore::new();
        let runner = runner(ScriptedCommandRunner::new(), store.clone());

        let mut kinds_seen: Vec<CheckKind> = Vec::new();
        let outcome = runner
            .run_full_suite(&ToolkitConfig::default(), |kind, _| {
                if kinds_seen.last() != Some(&kind) {
                    kinds_seen.push(kind);
                }
            })
            .await
            .unwrap();

        assert_eq!(kinds_seen, FULL_SUITE.to_vec());
        assert_eq!(outcome.suites.len(), 4);

        let names = store.result_names();
        for kind in FULL_SUITE {
            let expected = format!("{}_20240309_140530.json", kind.slug());
            assert!(names.contains(&expected), "missing {}", expected);
        }
    }
}
