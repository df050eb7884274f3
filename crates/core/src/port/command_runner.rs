// Command Runner Port - the bounded command-execution harness
// Abstraction for executing one shell command with a timeout

use crate::domain::CommandResult;
use async_trait::async_trait;

/// Default harness timeout when neither the check nor the config set one
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Bounded command-execution harness
///
/// Implementations:
/// - ShellCommandRunner: runs the command through the system shell
/// - ScriptedCommandRunner (mocks): canned results for tests
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` through the shell, waiting at most `timeout_secs`
    ///
    /// Never fails: non-zero exits, timeouts and launch failures are all
    /// reported inside the returned `CommandResult`.
    ///
    /// Dropping the returned future must terminate the child process.
    async fn run(&self, command: &str, timeout_secs: u64) -> CommandResult;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Mock runner returning canned results keyed by command string
    ///
    /// Unknown commands succeed with empty output.
    #[derive(Clone, Default)]
    pub struct ScriptedCommandRunner {
        responses: Arc<Mutex<HashMap<String, CommandResult>>>,
        calls: Arc<Mutex<Vec<(String, u64)>>>,
    }

    impl ScriptedCommandRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, command: impl Into<String>, result: CommandResult) -> Self {
            self.responses
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .insert(command.into(), result);
            self
        }

        /// Commands received so far, with the timeout each was given
        pub fn calls(&self) -> Vec<(String, u64)> {
            self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }
    }

    #[async_trait]
    impl CommandRunner for ScriptedCommandRunner {
        async fn run(&self, command: &str, timeout_secs: u64) -> CommandResult {
            self.calls
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push((command.to_string(), timeout_secs));

            self.responses
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .get(command)
                .cloned()
                .unwrap_or_else(|| CommandResult::completed(0, "", ""))
        }
    }
}
