//! Process execution utilities
//!
//! Runs the CF CLI as a child process and captures its output.

use crate::error::ProcessError;
use std::process::{Command, Stdio};
use tracing::{debug, instrument};

/// Utility for running external processes
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    debug: bool,
}

/// Result of a process execution
#[derive(Debug)]
pub struct ProcessResult {
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

impl ProcessRunner {
    /// Create a new process runner
    #[must_use]
    pub const fn new(debug: bool) -> Self {
        Self { debug }
    }

    /// Run a command and capture its output
    #[instrument(skip(self))]
    pub fn run_command_with_output(
        &self,
        command: &str,
        args: &[&str],
    ) -> Result<ProcessResult, ProcessError> {
        let cmd_str = format!("{} {}", command, args.join(" "));

        debug!("Running command with output capture: {}", cmd_str);

        let output = Command::new(command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| ProcessError::Spawn {
                command: cmd_str.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let exit_code = output.status.code();

        debug!(
            "Command finished: success={}, exit_code={:?}, stdout_len={}, stderr_len={}",
            output.status.success(),
            exit_code,
            stdout.len(),
            stderr.len()
        );

        if !output.status.success() {
            if self.debug {
                debug!("Command stdout: {}", stdout);
            }
            debug!("Command stderr: {}", stderr);
            return Err(ProcessError::Failed {
                command: cmd_str,
                exit_code,
                stdout,
                stderr,
            });
        }

        Ok(ProcessResult {
            stdout,
            stderr,
        })
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(false)
    }
}
