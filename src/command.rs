//! Process-backed [`CommandRunner`] and the success classification of its results.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::contract::{CommandResult, CommandRunner};
use crate::error::DeployError;

/// How a [`CommandResult`] is judged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SuccessPolicy {
    /// Success iff nothing was written to stderr. The exit code is ignored.
    #[default]
    Stderr,
    /// Success iff the process exited with status 0. Stderr text is reported as a warning.
    ExitStatus,
}

impl SuccessPolicy {
    pub fn is_success(self, result: &CommandResult) -> bool {
        match self {
            SuccessPolicy::Stderr => result.stderr.is_empty(),
            SuccessPolicy::ExitStatus => result.exit_code == Some(0),
        }
    }

    /// Judge `result`, logging stray stderr under [`SuccessPolicy::ExitStatus`].
    pub fn classify(self, result: &CommandResult) -> bool {
        let succeeded = self.is_success(result);
        if succeeded && !result.stderr.is_empty() {
            warn!(stderr = %result.stderr.trim_end(), "Command succeeded with output on stderr");
        }
        succeeded
    }
}

impl std::str::FromStr for SuccessPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stderr" => Ok(SuccessPolicy::Stderr),
            "exit_status" | "exit-status" => Ok(SuccessPolicy::ExitStatus),
            other => Err(format!(
                "unknown success policy {other:?} (expected \"stderr\" or \"exit_status\")"
            )),
        }
    }
}

/// Runs the AWS command line tool (or any executable) and captures its output.
#[derive(Debug, Clone)]
pub struct AwsCliRunner {
    program: String,
    timeout: Option<Duration>,
}

impl AwsCliRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    /// Abort the command if it has not exited after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for AwsCliRunner {
    fn default() -> Self {
        Self::new("aws")
    }
}

#[async_trait]
impl CommandRunner for AwsCliRunner {
    async fn run(&self, args: &[String]) -> Result<CommandResult, DeployError> {
        debug!(program = %self.program, ?args, "Spawning command");

        let child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child).await {
                Ok(output) => output,
                Err(_) => {
                    error!(program = %self.program, ?limit, "Command timed out");
                    return Err(DeployError::Timeout {
                        program: self.program.clone(),
                        limit,
                    });
                }
            },
            None => child.await,
        };

        let output = output.map_err(|source| {
            error!(program = %self.program, error = ?source, "Failed to launch command");
            DeployError::Spawn {
                program: self.program.clone(),
                source,
            }
        })?;

        let result = CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        };
        info!(
            program = %self.program,
            exit_code = ?result.exit_code,
            stdout_bytes = result.stdout.len(),
            stderr_bytes = result.stderr.len(),
            "Command finished"
        );
        Ok(result)
    }
}

/// Render an argument vector the way it would be typed after the program name.
pub fn display_args(args: &[String]) -> String {
    args.join(" ")
}
