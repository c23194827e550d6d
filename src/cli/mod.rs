//! Command execution against `esp-rainmaker-cli`
//!
//! Every gateway operation ends up as one invocation of the external CLI.
//! [`CommandRunner`] is the seam between the gateway and the process
//! boundary; [`ProcessRunner`] is the real implementation.

mod process;

pub use process::ProcessRunner;

use async_trait::async_trait;

use crate::Result;

/// Captured result of a single CLI invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the process exited with status zero
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with the given stdout
    #[must_use]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given stderr
    #[must_use]
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Text a caller sees: trimmed stdout, else trimmed stderr, else empty
    #[must_use]
    pub fn text(&self) -> &str {
        let stdout = self.stdout.trim();
        if stdout.is_empty() {
            self.stderr.trim()
        } else {
            stdout
        }
    }
}

/// Runs the external CLI with a list of arguments
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the CLI and capture its output and exit status
    ///
    /// # Errors
    ///
    /// Returns error if the process cannot be spawned or does not finish
    /// within the configured timeout
    async fn execute(&self, args: &[String]) -> Result<CommandOutput>;

    /// Run the CLI and return its text output
    ///
    /// Never fails: spawn errors and timeouts are logged and yield an
    /// empty string. Exit codes are not interpreted.
    async fn run(&self, args: &[String]) -> String {
        match self.execute(args).await {
            Ok(output) => output.text().to_string(),
            Err(e) => {
                tracing::warn!(
                    subcommand = args.first().map_or("", String::as_str),
                    error = %e,
                    "CLI invocation failed"
                );
                String::new()
            }
        }
    }
}

/// Build an owned argument list from string slices
#[must_use]
pub fn args<const N: usize>(parts: [&str; N]) -> Vec<String> {
    parts.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    struct FixedRunner(Result<CommandOutput>);

    #[async_trait]
    impl CommandRunner for FixedRunner {
        async fn execute(&self, _args: &[String]) -> Result<CommandOutput> {
            match &self.0 {
                Ok(output) => Ok(output.clone()),
                Err(e) => Err(Error::Command(e.to_string())),
            }
        }
    }

    #[test]
    fn text_prefers_stdout() {
        let output = CommandOutput {
            success: true,
            stdout: "  node list \n".to_string(),
            stderr: "warning".to_string(),
        };
        assert_eq!(output.text(), "node list");
    }

    #[test]
    fn text_falls_back_to_stderr() {
        let output = CommandOutput {
            success: false,
            stdout: " \n".to_string(),
            stderr: " Error: not logged in\n".to_string(),
        };
        assert_eq!(output.text(), "Error: not logged in");
    }

    #[test]
    fn text_is_empty_when_both_streams_are() {
        assert_eq!(CommandOutput::default().text(), "");
    }

    #[test]
    fn run_swallows_spawn_errors() {
        let runner = FixedRunner(Err(Error::Command("no such file".to_string())));
        let text = tokio_test::block_on(runner.run(&args(["getnodes"])));
        assert_eq!(text, "");
    }

    #[test]
    fn run_ignores_exit_status() {
        let runner = FixedRunner(Ok(CommandOutput::failed("Failed to get nodes")));
        let text = tokio_test::block_on(runner.run(&args(["getnodes"])));
        assert_eq!(text, "Failed to get nodes");
    }

    #[test]
    fn args_builds_owned_list() {
        assert_eq!(
            args(["getnodedetails", "abc", "--raw"]),
            vec!["getnodedetails", "abc", "--raw"]
        );
    }
}
