// Command Result - normalized outcome of one harness invocation

use serde::{Deserialize, Serialize};

/// Sentinel exit status for outcomes where no real exit code exists
/// (timeout, launch failure)
pub const SENTINEL_EXIT_STATUS: i32 = -1;

/// Result of running one shell command through the harness
///
/// Fields are private so that `succeeded` can only ever mirror
/// `exit_status == 0`. Serialized field names follow the artifact format
/// (`success`, `stdout`, `stderr`, `returncode`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCommandResult")]
pub struct CommandResult {
    #[serde(rename = "success")]
    succeeded: bool,
    stdout: String,
    stderr: String,
    #[serde(rename = "returncode")]
    exit_status: i32,
}

impl CommandResult {
    /// Process ran to completion with a real exit code
    pub fn completed(exit_status: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            succeeded: exit_status == 0,
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_status,
        }
    }

    /// Process was still running when the timeout elapsed
    pub fn timed_out(timeout_secs: u64) -> Self {
        Self {
            succeeded: false,
            stdout: String::new(),
            stderr: format!("Command timed out after {} seconds", timeout_secs),
            exit_status: SENTINEL_EXIT_STATUS,
        }
    }

    /// Command could not be launched at all
    ///
    /// An empty description is replaced so that callers always have
    /// something to show the operator.
    pub fn launch_failed(description: impl Into<String>) -> Self {
        let description = description.into();
        let stderr = if description.trim().is_empty() {
            "Command could not be launched".to_string()
        } else {
            description
        };

        Self {
            succeeded: false,
            stdout: String::new(),
            stderr,
            exit_status: SENTINEL_EXIT_STATUS,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    pub fn exit_status(&self) -> i32 {
        self.exit_status
    }

    /// One-line description for console output: trimmed stdout on success,
    /// trimmed stderr (or the exit status) on failure
    pub fn summary_line(&self) -> String {
        let text = if self.succeeded {
            self.stdout.trim()
        } else {
            self.stderr.trim()
        };

        match text.lines().next() {
            Some(line) if !line.is_empty() => line.to_string(),
            _ if self.succeeded => "OK".to_string(),
            _ => format!("exit status {}", self.exit_status),
        }
    }
}

/// Wire shape used when loading artifacts back from disk.
/// The stored `success` flag is ignored and recomputed from `returncode`.
#[derive(Deserialize)]
struct RawCommandResult {
    #[serde(default)]
    stdout: String,
    #[serde(default)]
    stderr: String,
    returncode: i32,
}

impl From<RawCommandResult> for CommandResult {
    fn from(raw: RawCommandResult) -> Self {
        Self::completed(raw.returncode, raw.stdout, raw.stderr)
    }
}
