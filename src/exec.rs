//! Command execution boundary
//!
//! Device properties and metadata files are read by running command lines
//! (`getprop ...`, `cat ...`). Callers only look at stdout: a command that
//! could not be started, timed out, or printed nothing all come back as an
//! empty [`CommandResult`].

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Exit code reported when the process never produced one
pub const NO_EXIT_CODE: i32 = -1;

/// Captured output of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandResult {
    /// Result used when the command could not be run at all
    pub fn empty() -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: NO_EXIT_CODE,
        }
    }

    /// Stdout with surrounding whitespace removed
    pub fn trimmed(&self) -> &str {
        self.stdout.trim()
    }

    /// True when there is no data to look at
    pub fn is_empty(&self) -> bool {
        self.trimmed().is_empty()
    }
}

/// Runs a command line and waits for it to finish
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run `command` to completion. Never fails; see [`CommandResult::empty`].
    async fn run(&self, command: &str) -> CommandResult;
}

/// Executes command lines through a POSIX-style shell (`<shell> -c <line>`)
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    shell: String,
    timeout: Option<Duration>,
}

impl ShellExecutor {
    /// Create an executor using the given interpreter
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
            timeout: None,
        }
    }

    /// Bound every command by `timeout`; an expired command yields empty output
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build an executor from the `[command]` config section
    pub fn from_config(config: &crate::config::schema::CommandConfig) -> Self {
        Self::new(config.shell.clone()).with_timeout(config.timeout_secs.map(Duration::from_secs))
    }
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self::new("sh")
    }
}

#[async_trait]
impl CommandExecutor for ShellExecutor {
    async fn run(&self, command: &str) -> CommandResult {
        debug!("Running `{} -c {}`", self.shell, command);

        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, cmd.output()).await {
                Ok(output) => output,
                Err(_) => {
                    warn!("Command timed out after {:?}: {}", limit, command);
                    return CommandResult::empty();
                }
            },
            None => cmd.output().await,
        };

        match output {
            Ok(output) => CommandResult {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                exit_code: output.status.code().unwrap_or(NO_EXIT_CODE),
            },
            Err(e) => {
                debug!("Failed to start `{}`: {}", command, e);
                CommandResult::empty()
            }
        }
    }
}

/// Scripted executor for tests: maps exact command lines to stdout
#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct ScriptedExecutor {
        responses: Mutex<HashMap<String, String>>,
        history: Mutex<Vec<String>>,
    }

    impl ScriptedExecutor {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, command: &str, stdout: &str) -> Self {
            self.set(command, stdout);
            self
        }

        pub fn set(&self, command: &str, stdout: &str) {
            self.responses
                .lock()
                .unwrap()
                .insert(command.to_string(), stdout.to_string());
        }

        pub fn calls(&self, command: &str) -> usize {
            self.history
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.as_str() == command)
                .count()
        }

        pub fn history(&self) -> Vec<String> {
            self.history.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandExecutor for ScriptedExecutor {
        async fn run(&self, command: &str) -> CommandResult {
            self.history.lock().unwrap().push(command.to_string());
            match self.responses.lock().unwrap().get(command) {
                Some(stdout) => CommandResult {
                    stdout: stdout.clone(),
                    stderr: String::new(),
                    exit_code: 0,
                },
                None => CommandResult::empty(),
            }
        }
    }
}
