//! Health check and login status endpoints

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use super::ApiState;
use crate::config::SERVICE_NAME;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

/// Login status response
#[derive(Serialize)]
pub struct LoginStatusResponse {
    pub logged_in: bool,
    pub email: String,
    pub profile: String,
    pub service: &'static str,
}

/// Liveness probe, independent of the RainMaker session
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
    })
}

/// Check (and if needed establish) the RainMaker session
async fn login_status(State(state): State<Arc<ApiState>>) -> Json<LoginStatusResponse> {
    let logged_in = state.client.ensure_authenticated().await;
    let credentials = state.client.credentials();

    Json(LoginStatusResponse {
        logged_in,
        email: credentials.email().unwrap_or("Not set").to_string(),
        profile: credentials.profile().to_string(),
        service: SERVICE_NAME,
    })
}

/// Build health router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/login-status", get(login_status))
        .with_state(state)
}
