//! Configuration management for the RainMaker gateway
//!
//! Values arrive through the command line (with environment fallbacks, see
//! `main.rs`) and are gathered here into a single [`Config`].

use std::time::Duration;

use secrecy::SecretString;

use crate::{Error, Result};

/// Port the HTTP API listens on when `RAINMAKER_API_PORT` is unset
pub const DEFAULT_PORT: u16 = 8099;

/// Profile used when none (or a null-like value) is configured
pub const DEFAULT_PROFILE: &str = "global";

/// Name of the RainMaker CLI binary looked up on `PATH`
pub const DEFAULT_CLI_PATH: &str = "esp-rainmaker-cli";

/// Service name reported by the health and login-status endpoints
pub const SERVICE_NAME: &str = "ESP RainMaker API";

/// Gateway configuration
#[derive(Debug)]
pub struct Config {
    /// RainMaker cloud credentials
    pub credentials: Credentials,

    /// Address the HTTP API binds to
    pub host: String,

    /// Port the HTTP API listens on
    pub port: u16,

    /// Path or name of the `esp-rainmaker-cli` executable
    pub cli_path: String,

    /// Upper bound for a single CLI invocation; `None` waits indefinitely
    pub command_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            cli_path: DEFAULT_CLI_PATH.to_string(),
            command_timeout: None,
        }
    }
}

impl Config {
    /// Socket address string for the HTTP listener
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check settings that would make the server unusable
    ///
    /// Missing credentials are not an error here: the gateway still serves
    /// `/health` and reports authentication failures per request.
    ///
    /// # Errors
    ///
    /// Returns error if the CLI path is blank or the timeout is zero
    pub fn validate(&self) -> Result<()> {
        if self.cli_path.trim().is_empty() {
            return Err(Error::Config("CLI path must not be empty".to_string()));
        }
        if self.command_timeout.is_some_and(|t| t.is_zero()) {
            return Err(Error::Config(
                "command timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Credentials for the RainMaker cloud service
#[derive(Debug, Default)]
pub struct Credentials {
    /// Account email (`ESP_RAINMAKER_EMAIL`)
    pub email: Option<String>,

    /// Account password (`ESP_RAINMAKER_PASSWORD`)
    pub password: Option<SecretString>,

    /// Raw profile setting (`ESP_RAINMAKER_PROFILE`), resolved lazily
    pub profile: Option<String>,
}

impl Credentials {
    /// Profile to pass to `login`, with null-like values mapped to `global`
    #[must_use]
    pub fn profile(&self) -> &str {
        resolve_profile(self.profile.as_deref())
    }

    /// Email, if set to a non-empty value
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.is_empty())
    }

    /// Email and password together, or `None` if either is missing
    #[must_use]
    pub fn login_pair(&self) -> Option<(&str, &SecretString)> {
        use secrecy::ExposeSecret;

        let password = self
            .password
            .as_ref()
            .filter(|p| !p.expose_secret().is_empty())?;
        Some((self.email()?, password))
    }
}

/// Resolve the configured profile name
///
/// Unset, blank and `"null"` (any case, surrounding whitespace ignored)
/// all resolve to [`DEFAULT_PROFILE`]. Any other value is passed to the CLI
/// exactly as configured.
#[must_use]
pub fn resolve_profile(profile: Option<&str>) -> &str {
    match profile {
        Some(p) if !p.trim().is_empty() && !p.trim().eq_ignore_ascii_case("null") => p,
        _ => DEFAULT_PROFILE,
    }
}
