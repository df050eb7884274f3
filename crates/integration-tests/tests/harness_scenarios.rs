//! Command harness scenarios against the real shell
//!
//! Every expected failure mode comes back as a failed `CommandResult`;
//! none of them panic or error.
#![cfg(unix)]

use std::time::{Duration, Instant};

use toolkit_core::domain::SENTINEL_EXIT_STATUS;
use toolkit_core::port::{CommandRunner, DEFAULT_TIMEOUT_SECS};
use toolkit_infra_system::ShellCommandRunner;

/// Scenario 1: `true` succeeds with empty stderr
#[tokio::test]
async fn test_true_command() {
    let result = ShellCommandRunner::new()
        .run("true", DEFAULT_TIMEOUT_SECS)
        .await;

    assert!(result.succeeded());
    assert_eq!(result.exit_status(), 0);
    assert_eq!(result.stderr(), "");
}

/// Scenario 2: `false` fails with exit status 1
#[tokio::test]
async fn test_false_command() {
    let result = ShellCommandRunner::new()
        .run("false", DEFAULT_TIMEOUT_SECS)
        .await;

    assert!(!result.succeeded());
    assert_eq!(result.exit_status(), 1);
}

/// Scenario 3: `sleep 5` with a 1 second budget times out promptly
#[tokio::test]
async fn test_sleep_times_out() {
    let started = Instant::now();
    let result = ShellCommandRunner::new().run("sleep 5", 1).await;

    assert!(!result.succeeded());
    assert_eq!(result.exit_status(), SENTINEL_EXIT_STATUS);
    assert!(result.stderr().contains("timed out after 1 seconds"));
    assert!(started.elapsed() < Duration::from_secs(4));
}

/// Scenario 4: a missing executable is a failed result, not an error
#[tokio::test]
async fn test_missing_executable() {
    let result = ShellCommandRunner::new()
        .run("definitely-not-a-real-binary-xyz", DEFAULT_TIMEOUT_SECS)
        .await;

    assert!(!result.succeeded());
    assert_eq!(result.exit_status(), SENTINEL_EXIT_STATUS);
    assert!(!result.stderr().is_empty());
}

/// Timeout kills the whole pipeline, including background grandchildren
#[tokio::test]
async fn test_timeout_terminates_process_group() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("survived");
    let command = format!("(sleep 2; touch {}) & wait", marker.display());

    let result = ShellCommandRunner::new().run(&command, 1).await;
    assert_eq!(result.exit_status(), SENTINEL_EXIT_STATUS);

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert!(!marker.exists(), "grandchild outlived the timeout");
}

/// Same deterministic command twice gives equal results
#[tokio::test]
async fn test_idempotence() {
    let runner = ShellCommandRunner::new();
    let first = runner.run("echo toolkit; exit 4", 5).await;
    let second = runner.run("echo toolkit; exit 4", 5).await;

    assert_eq!(first, second);
    assert_eq!(first.exit_status(), 4);
    assert_eq!(first.stdout(), "toolkit\n");
}
