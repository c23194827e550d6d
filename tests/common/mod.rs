//! Shared test utilities

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use rainmaker_gateway::{ApiState, CommandOutput, CommandRunner, Credentials, Result};
use secrecy::SecretString;
use tower::ServiceExt;

/// Command runner that answers from a script instead of spawning processes
///
/// Responses are looked up by the full argument list first, then by the
/// subcommand alone. Unscripted commands fail with empty output.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: HashMap<String, CommandOutput>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the output for an exact argument list or a bare subcommand
    #[must_use]
    pub fn on(mut self, args: &str, output: CommandOutput) -> Self {
        self.responses.insert(args.to_string(), output);
        self
    }

    /// Arguments of every invocation so far
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of invocations of a subcommand
    pub fn count(&self, subcommand: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.first().map(String::as_str) == Some(subcommand))
            .count()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn execute(&self, args: &[String]) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(args.to_vec());
        let key = args.join(" ");
        let output = self
            .responses
            .get(&key)
            .or_else(|| args.first().and_then(|sub| self.responses.get(sub)))
            .cloned()
            .unwrap_or_else(|| CommandOutput::failed(""));
        Ok(output)
    }
}

/// Credentials with email and password set
#[must_use]
pub fn test_credentials() -> Credentials {
    Credentials {
        email: Some("user@example.com".to_string()),
        password: Some(SecretString::from("s3cret".to_string())),
        profile: None,
    }
}

/// Build the full API router over a scripted runner
pub fn build_test_router(runner: Arc<ScriptedRunner>, credentials: Credentials) -> axum::Router {
    let state = Arc::new(ApiState::new(runner, credentials));
    rainmaker_gateway::api::router(state)
}

/// Send a request and decode the JSON body
pub async fn send(app: axum::Router, request: Request<Body>) -> serde_json::Value {
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// GET a path and decode the JSON body
pub async fn get(app: axum::Router, uri: &str) -> serde_json::Value {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

/// POST a body to a path and decode the JSON response
pub async fn post(app: axum::Router, uri: &str, body: &str) -> serde_json::Value {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}
