//! CLI execution via subprocess

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;

use super::{CommandOutput, CommandRunner};
use crate::{Error, Result};

/// Runs `esp-rainmaker-cli` as a child process
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: String,
    timeout: Option<Duration>,
}

impl ProcessRunner {
    /// Create a runner for the given executable
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    /// Bound each invocation; the child is killed when the limit is hit
    #[must_use]
    pub const fn with_timeout(mut self, limit: Option<Duration>) -> Self {
        self.timeout = limit;
        self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn execute(&self, args: &[String]) -> Result<CommandOutput> {
        let subcommand = args.first().map_or("", String::as_str);
        tracing::debug!(program = %self.program, subcommand, "running CLI");

        let child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::Command(format!("failed to spawn {}: {e}", self.program)))?;

        // Dropping the future on timeout drops the child, which kills it
        let output = match self.timeout {
            Some(limit) => timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| Error::Timeout(limit))??,
            None => child.wait_with_output().await?,
        };

        let result = CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.success {
            let code = output.status.code().unwrap_or(-1);
            tracing::debug!(subcommand, code, stderr = %result.stderr.trim(), "CLI exited with failure");
        }

        Ok(result)
    }
}
