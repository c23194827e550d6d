//! Node endpoints
//!
//! Each handler checks the CLI session first and answers with an `error`
//! field (still status 200) when it cannot be established.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;

use super::{AUTH_FAILED, ApiState};
use crate::rainmaker::{ClassifiedDevice, NodeSummary, PARSE_FAILURE_MESSAGE, ParseFailure};

/// Error reported when `setparams` is called without a usable body
pub const NO_DATA: &str = "No data provided";

/// Response for `/getnodes`
#[derive(Debug, Serialize)]
pub struct NodeListResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    pub nodes: Vec<String>,
    pub count: usize,
}

/// Response for `/nodedetails/{node_id}`
#[derive(Debug, Serialize)]
pub struct NodeDetailsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    pub node_id: String,
    /// Parsed document, raw CLI text on parse failure, `null` on auth failure
    pub details: Value,
}

/// Response for `/getparams/{node_id}`
#[derive(Debug, Serialize)]
pub struct ParamsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    pub node_id: String,
    /// Parsed params, raw CLI text on parse failure, `null` on auth failure
    pub params: Value,
}

/// Response for `/setparams/{node_id}`
#[derive(Debug, Serialize)]
pub struct SetParamsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub node_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_sent: Option<Value>,
}

impl SetParamsResponse {
    fn failed(node_id: String, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            node_id,
            success: false,
            output: None,
            data_sent: None,
        }
    }
}

/// Response for `/rainmakernodes`
#[derive(Debug, Serialize)]
pub struct RainmakerNodesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    pub count: usize,
    pub devices: Vec<ClassifiedDevice>,
}

/// Response for `/allnodes`
#[derive(Debug, Serialize)]
pub struct AllNodesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    pub nodes: Vec<String>,
    pub count: usize,
    pub node_details: Vec<NodeSummary>,
}

/// Build node routes
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/getnodes", get(get_nodes))
        .route("/nodedetails/{node_id}", get(node_details))
        .route("/getparams/{node_id}", get(get_params))
        .route("/setparams/{node_id}", post(set_params))
        .route("/rainmakernodes", get(rainmaker_nodes))
        .route("/allnodes", get(all_nodes))
        .with_state(state)
}

/// Split a CLI JSON result into the payload and an optional error marker
fn json_or_raw(result: Result<Value, ParseFailure>, node_id: &str) -> (Value, Option<&'static str>) {
    match result {
        Ok(value) => (value, None),
        Err(failure) => {
            tracing::debug!(node_id, error = %failure.reason, "CLI output is not JSON");
            (Value::String(failure.raw), Some(PARSE_FAILURE_MESSAGE))
        }
    }
}

/// List node IDs
async fn get_nodes(State(state): State<Arc<ApiState>>) -> Json<NodeListResponse> {
    if !state.client.ensure_authenticated().await {
        return Json(NodeListResponse {
            error: Some(AUTH_FAILED),
            nodes: Vec::new(),
            count: 0,
        });
    }

    let nodes = state.client.list_nodes().await;
    tracing::debug!(count = nodes.len(), "listed nodes");
    Json(NodeListResponse {
        error: None,
        count: nodes.len(),
        nodes,
    })
}

/// Raw node details
async fn node_details(
    State(state): State<Arc<ApiState>>,
    Path(node_id): Path<String>,
) -> Json<NodeDetailsResponse> {
    if !state.client.ensure_authenticated().await {
        return Json(NodeDetailsResponse {
            error: Some(AUTH_FAILED),
            node_id,
            details: Value::Null,
        });
    }

    let (details, error) = json_or_raw(state.client.node_details(&node_id).await, &node_id);
    Json(NodeDetailsResponse {
        error,
        node_id,
        details,
    })
}

/// Current parameter values
async fn get_params(
    State(state): State<Arc<ApiState>>,
    Path(node_id): Path<String>,
) -> Json<ParamsResponse> {
    if !state.client.ensure_authenticated().await {
        return Json(ParamsResponse {
            error: Some(AUTH_FAILED),
            node_id,
            params: Value::Null,
        });
    }

    let (params, error) = json_or_raw(state.client.get_params(&node_id).await, &node_id);
    Json(ParamsResponse {
        error,
        node_id,
        params,
    })
}

/// Whether a JSON value counts as "no data"
#[allow(clippy::float_cmp)]
fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Decode a request body, `None` for empty or "no data" payloads
fn parse_payload(body: &[u8]) -> serde_json::Result<Option<Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let value: Value = serde_json::from_slice(body)?;
    Ok((!is_empty_payload(&value)).then_some(value))
}

/// Update parameter values
async fn set_params(
    State(state): State<Arc<ApiState>>,
    Path(node_id): Path<String>,
    body: Bytes,
) -> Json<SetParamsResponse> {
    if !state.client.ensure_authenticated().await {
        return Json(SetParamsResponse::failed(node_id, AUTH_FAILED));
    }

    let data = match parse_payload(&body) {
        Ok(Some(data)) => data,
        Ok(None) => return Json(SetParamsResponse::failed(node_id, NO_DATA)),
        Err(e) => {
            tracing::debug!(node_id = %node_id, error = %e, "invalid setparams body");
            return Json(SetParamsResponse::failed(node_id, e.to_string()));
        }
    };

    match state.client.set_params(&node_id, &data).await {
        Ok(outcome) => Json(SetParamsResponse {
            error: None,
            node_id,
            success: outcome.success,
            output: Some(outcome.output),
            data_sent: Some(data),
        }),
        Err(e) => Json(SetParamsResponse::failed(node_id, e.to_string())),
    }
}

/// RainMaker devices, excluding pure Matter nodes
async fn rainmaker_nodes(State(state): State<Arc<ApiState>>) -> Json<RainmakerNodesResponse> {
    if !state.client.ensure_authenticated().await {
        return Json(RainmakerNodesResponse {
            error: Some(AUTH_FAILED),
            count: 0,
            devices: Vec::new(),
        });
    }

    let devices = state.client.rainmaker_devices().await;
    Json(RainmakerNodesResponse {
        error: None,
        count: devices.len(),
        devices,
    })
}

/// Every node with its device family
async fn all_nodes(State(state): State<Arc<ApiState>>) -> Json<AllNodesResponse> {
    if !state.client.ensure_authenticated().await {
        return Json(AllNodesResponse {
            error: Some(AUTH_FAILED),
            nodes: Vec::new(),
            count: 0,
            node_details: Vec::new(),
        });
    }

    let node_details = state.client.all_nodes().await;
    Json(AllNodesResponse {
        error: None,
        nodes: node_details.iter().map(|n| n.node_id.clone()).collect(),
        count: node_details.len(),
        node_details,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn falsy_payloads_are_empty() {
        for value in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(is_empty_payload(&value), "value = {value}");
        }
        for value in [json!(true), json!(1), json!("x"), json!([1]), json!({"Light": {"Power": true}})] {
            assert!(!is_empty_payload(&value), "value = {value}");
        }
    }

    #[test]
    fn tiny_numbers_are_data() {
        assert!(!is_empty_payload(&json!(1e-300)));
        assert!(!is_empty_payload(&json!(-0.5)));
        assert_eq!(parse_payload(b"1e-300").unwrap(), Some(json!(1e-300)));
    }

    #[test]
    fn blank_body_is_no_data() {
        assert_eq!(parse_payload(b"").unwrap(), None);
        assert_eq!(parse_payload(b"  \n").unwrap(), None);
        assert_eq!(parse_payload(b"{}").unwrap(), None);
    }

    #[test]
    fn invalid_body_is_an_error() {
        assert!(parse_payload(b"{not json").is_err());
    }

    #[test]
    fn valid_body_is_returned() {
        let value = parse_payload(br#"{"Light": {"Power": false}}"#).unwrap().unwrap();
        assert_eq!(value, json!({"Light": {"Power": false}}));
    }

    #[test]
    fn parse_failure_becomes_raw_string() {
        let failure = ParseFailure {
            raw: "Error: node not found".to_string(),
            reason: "expected value".to_string(),
        };
        let (value, error) = json_or_raw(Err(failure), "abcdef1234567890");
        assert_eq!(value, json!("Error: node not found"));
        assert_eq!(error, Some(PARSE_FAILURE_MESSAGE));
    }
}
