use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use rainmaker_gateway::config::{DEFAULT_CLI_PATH, DEFAULT_PORT};
use rainmaker_gateway::{ApiServer, Config, Credentials};

/// RainMaker API - HTTP gateway for ESP RainMaker nodes
#[derive(Parser)]
#[command(name = "rainmaker-api", version, about)]
struct Cli {
    /// ESP RainMaker account email
    #[arg(long, env = "ESP_RAINMAKER_EMAIL")]
    email: Option<String>,

    /// ESP RainMaker account password
    #[arg(long, env = "ESP_RAINMAKER_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// ESP RainMaker profile; unset, empty or "null" means "global"
    #[arg(long, env = "ESP_RAINMAKER_PROFILE")]
    profile: Option<String>,

    /// Port to listen on
    #[arg(long, env = "RAINMAKER_API_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Address to bind to
    #[arg(long, env = "RAINMAKER_API_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Path to the esp-rainmaker-cli executable
    #[arg(long, env = "ESP_RAINMAKER_CLI", default_value = DEFAULT_CLI_PATH)]
    cli_path: String,

    /// Kill CLI invocations that run longer than this many seconds
    #[arg(long, env = "RAINMAKER_CLI_TIMEOUT_SECS")]
    command_timeout: Option<u64>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            credentials: Credentials {
                email: self.email,
                password: self.password.map(SecretString::from),
                profile: self.profile,
            },
            host: self.host,
            port: self.port,
            cli_path: self.cli_path,
            command_timeout: self.command_timeout.map(Duration::from_secs),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info,rainmaker_gateway=info",
        1 => "info,rainmaker_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli.into_config()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!(
        email = config.credentials.email().unwrap_or("NOT SET"),
        password = if config.credentials.password.is_some() { "SET" } else { "NOT SET" },
        profile = config.credentials.profile(),
        port = config.port,
        cli = %config.cli_path,
        timeout = ?config.command_timeout,
        "starting rainmaker gateway"
    );

    let server = ApiServer::new(config);
    server.login_on_startup().await;
    server.run().await?;

    Ok(())
}
