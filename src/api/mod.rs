//! HTTP API server for the RainMaker gateway
//!
//! Every endpoint answers with a JSON body and status 200, including on
//! failure; callers check the `error` field.

pub mod health;
pub mod nodes;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::cli::{CommandRunner, ProcessRunner};
use crate::rainmaker::RainmakerClient;
use crate::{Config, Result};

/// Error reported when the CLI session cannot be established
pub const AUTH_FAILED: &str = "Authentication failed";

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub client: RainmakerClient,
}

impl ApiState {
    /// Build state over an arbitrary command runner
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>, credentials: crate::config::Credentials) -> Self {
        Self {
            client: RainmakerClient::new(runner, Arc::new(credentials)),
        }
    }
}

/// Build the router with all routes
pub fn router(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(nodes::router(state.clone()))
        .merge(health::router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    bind_addr: String,
}

impl ApiServer {
    /// Create a server that drives the real CLI
    #[must_use]
    pub fn new(config: Config) -> Self {
        let runner =
            ProcessRunner::new(config.cli_path.clone()).with_timeout(config.command_timeout);
        let bind_addr = config.bind_addr();
        Self::with_runner(Arc::new(runner), config.credentials, bind_addr)
    }

    /// Create a server over a custom command runner
    #[must_use]
    pub fn with_runner(
        runner: Arc<dyn CommandRunner>,
        credentials: crate::config::Credentials,
        bind_addr: String,
    ) -> Self {
        Self {
            state: Arc::new(ApiState::new(runner, credentials)),
            bind_addr,
        }
    }

    /// Log in once before serving, so the first request is fast
    ///
    /// Failure is logged and not fatal: every endpoint re-checks the session.
    pub async fn login_on_startup(&self) -> bool {
        let ok = self.state.client.ensure_authenticated().await;
        if !ok {
            tracing::warn!("failed to log in to ESP RainMaker, API endpoints may not work");
        }
        ok
    }

    /// Run the API server until Ctrl-C
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(&self.bind_addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(addr = %self.bind_addr, "API server listening");

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        tracing::info!("API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown signal received");
    }
}
