// Shell command runner - the bounded command-execution harness
// reason: tokio for async process management and timers, nix for
// process-group termination on Unix
use async_trait::async_trait;
use std::process::{Output, Stdio};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use toolkit_core::domain::CommandResult;
use toolkit_core::port::CommandRunner;

/// Exit statuses the shell reserves for "could not launch the command"
#[cfg(unix)]
const LAUNCH_FAILURE_STATUSES: &[i32] = &[126, 127];
#[cfg(windows)]
const LAUNCH_FAILURE_STATUSES: &[i32] = &[9009];

/// Internal failure modes, all folded into a `CommandResult`
#[derive(Error, Debug)]
enum HarnessError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(std::io::Error),

    #[error("Process timeout after {0}s")]
    Timeout(u64),

    #[error("IO error while waiting for process: {0}")]
    Wait(std::io::Error),
}

/// Runs commands through the system shell (`sh -c` / `cmd /C`)
///
/// On Unix each command gets its own process group so that a timeout
/// terminates the whole pipeline, not just the shell.
#[derive(Debug, Clone)]
pub struct ShellCommandRunner {
    shell: String,
    shell_flag: String,
}

impl ShellCommandRunner {
    /// Create a runner using the platform shell
    ///
    /// # Example
    /// ```ignore
    /// let runner = ShellCommandRunner::new();
    /// let result = runner.run("uptime", 30).await;
    /// ```
    pub fn new() -> Self {
        #[cfg(windows)]
        {
            Self::with_shell("cmd", "/C")
        }

        #[cfg(not(windows))]
        {
            Self::with_shell("sh", "-c")
        }
    }

    /// Create a runner using an explicit shell program and its
    /// "run this string" flag
    pub fn with_shell(shell: impl Into<String>, shell_flag: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
            shell_flag: shell_flag.into(),
        }
    }

    fn build_command(&self, command: &str) -> Command {
        let mut cmd = Command::new(&self.shell);
        cmd.arg(&self.shell_flag)
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        cmd.process_group(0);

        cmd
    }

    /// Spawn child process and wait for output
    async fn spawn_and_wait(&self, command: &str, timeout_secs: u64) -> Result<Output, HarnessError> {
        let child = self
            .build_command(command)
            .spawn()
            .map_err(HarnessError::SpawnFailed)?;
        let guard = GroupKillGuard { pid: child.id() };

        match timeout(Duration::from_secs(timeout_secs), child.wait_with_output()).await {
            Ok(Ok(output)) => {
                guard.disarm();
                Ok(output)
            }
            Ok(Err(e)) => Err(HarnessError::Wait(e)),
            Err(_) => Err(HarnessError::Timeout(timeout_secs)),
        }
    }

    /// Build command result from process output
    fn build_result(&self, output: Output) -> CommandResult {
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        match output.status.code() {
            Some(code) if LAUNCH_FAILURE_STATUSES.contains(&code) => {
                if stderr.trim().is_empty() {
                    CommandResult::launch_failed(format!(
                        "Command not found or not executable (shell exit status {})",
                        code
                    ))
                } else {
                    CommandResult::launch_failed(stderr)
                }
            }
            Some(code) => CommandResult::completed(code, stdout, stderr),
            None => terminated_by_signal(&output, stdout, stderr),
        }
    }

    fn into_command_result(
        &self,
        outcome: Result<Output, HarnessError>,
    ) -> CommandResult {
        match outcome {
            Ok(output) => self.build_result(output),
            Err(HarnessError::Timeout(secs)) => CommandResult::timed_out(secs),
            Err(HarnessError::SpawnFailed(e)) => {
                CommandResult::launch_failed(format!("Failed to launch {}: {}", self.shell, e))
            }
            Err(e @ HarnessError::Wait(_)) => CommandResult::launch_failed(e.to_string()),
        }
    }
}

impl Default for ShellCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
fn terminated_by_signal(output: &Output, stdout: String, stderr: String) -> CommandResult {
    use std::os::unix::process::ExitStatusExt;

    let signal = output.status.signal().unwrap_or(0);
    let stderr = if stderr.trim().is_empty() {
        format!("Process terminated by signal {}", signal)
    } else {
        stderr
    };
    // Same convention as a negative return code from a signalled child
    CommandResult::completed(-signal, stdout, stderr)
}

#[cfg(not(unix))]
fn terminated_by_signal(_output: &Output, stdout: String, stderr: String) -> CommandResult {
    CommandResult::completed(toolkit_core::domain::SENTINEL_EXIT_STATUS, stdout, stderr)
}

/// Kills the child's process group when dropped while armed
///
/// Covers both the timeout path and cancellation of the `run` future
/// (e.g. Ctrl-C in the console while a suite is running).
struct GroupKillGuard {
    pid: Option<u32>,
}

impl GroupKillGuard {
    fn disarm(mut self) {
        self.pid = None;
    }
}

impl Drop for GroupKillGuard {
    fn drop(&mut self) {
        if let Some(pid) = self.pid.take() {
            terminate_process_group(pid);
        }
    }
}

/// Kill the process group led by `pid` (the shell and everything it started)
#[cfg(unix)]
fn terminate_process_group(pid: u32) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return;
    };
    if let Err(e) = killpg(Pid::from_raw(raw), Signal::SIGKILL) {
        // ESRCH: the group exited between the timeout and the kill
        debug!(pid, error = %e, "Process group already gone");
    }
}

#[cfg(not(unix))]
fn terminate_process_group(_pid: u32) {
    // kill_on_drop terminates the direct child
}

#[async_trait]
impl CommandRunner for ShellCommandRunner {
    async fn run(&self, command: &str, timeout_secs: u64) -> CommandResult {
        if command.trim().is_empty() {
            return CommandResult::launch_failed("Empty command");
        }
        let timeout_secs = timeout_secs.max(1);
        let started = Instant::now();

        debug!(
            command = %command,
            timeout_secs,
            shell = %self.shell,
            "Starting shell command"
        );

        let outcome = self.spawn_and_wait(command, timeout_secs).await;
        if let Err(e) = &outcome {
            warn!(command = %command, error = %e, "Shell command did not complete");
        }
        let result = self.into_command_result(outcome);

        debug!(
            command = %command,
            duration_ms = started.elapsed().as_millis() as u64,
            exit_status = result.exit_status(),
            succeeded = result.succeeded(),
            "Shell command finished"
        );

        result
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use toolkit_core::domain::SENTINEL_EXIT_STATUS;

    #[tokio::test]
    async fn test_true_succeeds() {
        let result = ShellCommandRunner::new().run("true", 5).await;

        assert!(result.succeeded());
        assert_eq!(result.exit_status(), 0);
        assert_eq!(result.stderr(), "");
    }

    #[tokio::test]
    async fn test_false_fails_with_exit_code() {
        let result = ShellCommandRunner::new().run("false", 5).await;

        assert!(!result.succeeded());
        assert_eq!(result.exit_status(), 1);
    }

    #[tokio::test]
    async fn test_exit_code_passthrough() {
        let result = ShellCommandRunner::new().run("exit 42", 5).await;

        assert!(!result.succeeded());
        assert_eq!(result.exit_status(), 42);
    }

    #[tokio::test]
    async fn test_captures_both_streams_verbatim() {
        let result = ShellCommandRunner::new()
            .run("echo hello; echo oops >&2", 5)
            .await;

        assert!(result.succeeded());
        assert_eq!(result.stdout(), "hello\n");
        assert_eq!(result.stderr(), "oops\n");
    }

    #[tokio::test]
    async fn test_timeout() {
        let started = Instant::now();
        let result = ShellCommandRunner::new().run("sleep 5", 1).await;

        assert!(!result.succeeded());
        assert_eq!(result.exit_status(), SENTINEL_EXIT_STATUS);
        assert!(result.stdout().is_empty());
        assert!(result.stderr().contains("timed out after 1"));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_timeout_discards_partial_output() {
        let result = ShellCommandRunner::new()
            .run("echo partial; sleep 5; echo never", 1)
            .await;

        assert_eq!(result.exit_status(), SENTINEL_EXIT_STATUS);
        assert!(result.stdout().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_run_returns_promptly() {
        let runner = ShellCommandRunner::new();
        let started = Instant::now();

        let outcome = timeout(Duration::from_millis(300), runner.run("sleep 5", 30)).await;

        assert!(outcome.is_err());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_nonexistent_binary() {
        let result = ShellCommandRunner::new()
            .run("definitely-not-a-real-binary-xyz", 5)
            .await;

        assert!(!result.succeeded());
        assert_eq!(result.exit_status(), SENTINEL_EXIT_STATUS);
        assert!(!result.stderr().is_empty());
        assert!(result.stdout().is_empty());
    }

    #[tokio::test]
    async fn test_missing_shell_is_launch_failure() {
        let runner = ShellCommandRunner::with_shell("/nonexistent/shell-xyz", "-c");
        let result = runner.run("true", 5).await;

        assert!(!result.succeeded());
        assert_eq!(result.exit_status(), SENTINEL_EXIT_STATUS);
        assert!(result.stderr().contains("/nonexistent/shell-xyz"));
    }

    #[tokio::test]
    async fn test_empty_command_is_launch_failure() {
        let result = ShellCommandRunner::new().run("   ", 5).await;

        assert!(!result.succeeded());
        assert_eq!(result.exit_status(), SENTINEL_EXIT_STATUS);
    }

    #[tokio::test]
    async fn test_killed_by_signal() {
        let result = ShellCommandRunner::new().run("kill -9 $$", 5).await;

        assert!(!result.succeeded());
        assert_eq!(result.exit_status(), -9);
        assert!(result.stderr().contains("signal 9"));
    }

    #[tokio::test]
    async fn test_non_utf8_output_is_lossy() {
        let result = ShellCommandRunner::new().run(r"printf 'a\377b'", 5).await;

        assert!(result.succeeded());
        assert_eq!(result.stdout(), "a\u{FFFD}b");
    }

    #[tokio::test]
    async fn test_idempotent_for_deterministic_command() {
        let runner = ShellCommandRunner::new();
        let first = runner.run("echo same", 5).await;
        let second = runner.run("echo same", 5).await;

        assert_eq!(first, second);
    }
}
