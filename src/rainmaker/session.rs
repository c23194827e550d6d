//! RainMaker cloud session handling
//!
//! The CLI keeps its own session file. The gateway never remembers whether
//! it is logged in; it probes the CLI before each operation and logs in
//! again when the probe says so.

use secrecy::ExposeSecret;

use crate::cli::{CommandOutput, CommandRunner, args};
use crate::config::Credentials;

/// Whether a probe result indicates a missing or expired session
#[must_use]
pub fn needs_login(probe: &CommandOutput) -> bool {
    let stderr = probe.stderr.to_lowercase();
    !probe.success || stderr.contains("login") || stderr.contains("authentication")
}

/// Make sure the CLI holds a valid session, logging in if needed
///
/// Returns `false` when credentials are missing or the login command
/// exits non-zero. Missing credentials are never retried.
pub async fn ensure_authenticated(runner: &dyn CommandRunner, credentials: &Credentials) -> bool {
    match runner.execute(&args(["getnodes"])).await {
        Ok(probe) if !needs_login(&probe) => return true,
        Ok(_) => tracing::debug!("CLI session missing or expired"),
        Err(e) => tracing::warn!(error = %e, "session probe failed"),
    }

    let Some((email, password)) = credentials.login_pair() else {
        tracing::error!("ESP_RAINMAKER_EMAIL and ESP_RAINMAKER_PASSWORD must be set");
        return false;
    };
    let profile = credentials.profile();

    tracing::info!(email, profile, "logging in to ESP RainMaker");

    let login = vec![
        "login".to_string(),
        "--email".to_string(),
        email.to_string(),
        "--password".to_string(),
        password.expose_secret().to_string(),
        "--profile".to_string(),
        profile.to_string(),
    ];

    match runner.execute(&login).await {
        Ok(output) if output.success => {
            tracing::info!("logged in to ESP RainMaker");
            true
        }
        Ok(output) => {
            tracing::warn!(stderr = %output.stderr.trim(), "ESP RainMaker login failed");
            false
        }
        Err(e) => {
            tracing::warn!(error = %e, "ESP RainMaker login failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use secrecy::SecretString;

    use super::*;
    use crate::{Error, Result};

    /// Replays queued outputs and records the arguments it was called with
    #[derive(Default)]
    struct QueueRunner {
        outputs: Mutex<VecDeque<Result<CommandOutput>>>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl QueueRunner {
        fn new(outputs: Vec<Result<CommandOutput>>) -> Self {
            Self {
                outputs: Mutex::new(outputs.into()),
                calls: Mutex::default(),
            }
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandRunner for QueueRunner {
        async fn execute(&self, args: &[String]) -> Result<CommandOutput> {
            self.calls.lock().unwrap().push(args.to_vec());
            self.outputs
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(CommandOutput::default()))
        }
    }

    fn credentials(profile: Option<&str>) -> Credentials {
        Credentials {
            email: Some("user@example.com".to_string()),
            password: Some(SecretString::from("s3cret".to_string())),
            profile: profile.map(ToString::to_string),
        }
    }

    #[test]
    fn probe_classification() {
        assert!(!needs_login(&CommandOutput::ok("1. abcdef1234567890")));
        assert!(needs_login(&CommandOutput::failed("")));
        assert!(needs_login(&CommandOutput {
            success: true,
            stdout: String::new(),
            stderr: "Please LOGIN first".to_string(),
        }));
        assert!(needs_login(&CommandOutput {
            success: true,
            stdout: String::new(),
            stderr: "Authentication token expired".to_string(),
        }));
    }

    #[tokio::test]
    async fn valid_session_skips_login() {
        let runner = QueueRunner::new(vec![Ok(CommandOutput::ok("1. abcdef1234567890"))]);
        assert!(ensure_authenticated(&runner, &credentials(None)).await);
        assert_eq!(runner.calls(), vec![vec!["getnodes".to_string()]]);
    }

    #[tokio::test]
    async fn expired_session_logs_in_with_default_profile() {
        let runner = QueueRunner::new(vec![
            Ok(CommandOutput::failed("Error: login required")),
            Ok(CommandOutput::ok("Login successful")),
        ]);
        assert!(ensure_authenticated(&runner, &credentials(Some("null"))).await);

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[1],
            args([
                "login",
                "--email",
                "user@example.com",
                "--password",
                "s3cret",
                "--profile",
                "global"
            ])
        );
    }

    #[tokio::test]
    async fn explicit_profile_is_passed_through() {
        let runner = QueueRunner::new(vec![
            Ok(CommandOutput::failed("")),
            Ok(CommandOutput::ok("")),
        ]);
        assert!(ensure_authenticated(&runner, &credentials(Some("china"))).await);
        assert_eq!(runner.calls()[1].last().map(String::as_str), Some("china"));
    }

    #[tokio::test]
    async fn missing_credentials_fail_without_login() {
        let runner = QueueRunner::new(vec![Ok(CommandOutput::failed("not logged in"))]);
        assert!(!ensure_authenticated(&runner, &Credentials::default()).await);
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn rejected_login_fails() {
        let runner = QueueRunner::new(vec![
            Ok(CommandOutput::failed("")),
            Ok(CommandOutput::failed("Invalid credentials")),
        ]);
        assert!(!ensure_authenticated(&runner, &credentials(None)).await);
    }

    #[tokio::test]
    async fn unspawnable_cli_is_not_authenticated() {
        let runner = QueueRunner::new(vec![
            Err(Error::Command("no such file".to_string())),
            Err(Error::Command("no such file".to_string())),
        ]);
        assert!(!ensure_authenticated(&runner, &credentials(None)).await);
    }
}
