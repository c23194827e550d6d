//! High-level RainMaker operations over the CLI

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::classify::{ClassifiedDevice, DeviceFamily, classify_family, classify_rainmaker};
use super::detail::{MatterView, NodeDetails, ParseFailure, parse_json_output};
use super::node_list::parse_node_list;
use super::session;
use crate::cli::{CommandRunner, args};
use crate::config::Credentials;
use crate::Result;

/// Node entry in the all-nodes view
#[derive(Debug, Clone, Serialize)]
pub struct NodeSummary {
    pub node_id: String,
    pub device_type: DeviceFamily,
    pub device_name: String,
    pub details: Value,
}

/// Outcome of a `setparams` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetParamsOutcome {
    /// Heuristic success, see [`set_params_succeeded`]
    pub success: bool,
    pub output: String,
}

/// Guess whether `setparams` worked from its free-text output
///
/// The CLI prints nothing on success, so any output mentioning "error" or
/// "failed" counts as failure. A parameter value containing either word
/// is misreported.
#[must_use]
pub fn set_params_succeeded(output: &str) -> bool {
    let lower = output.to_lowercase();
    !lower.contains("error") && !lower.contains("failed")
}

/// Client for RainMaker operations, backed by the CLI
#[derive(Clone)]
pub struct RainmakerClient {
    runner: Arc<dyn CommandRunner>,
    credentials: Arc<Credentials>,
}

impl RainmakerClient {
    /// Create a client over the given runner and credentials
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>, credentials: Arc<Credentials>) -> Self {
        Self {
            runner,
            credentials,
        }
    }

    /// Configured credentials
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Probe the CLI session and log in if needed
    pub async fn ensure_authenticated(&self) -> bool {
        session::ensure_authenticated(self.runner.as_ref(), &self.credentials).await
    }

    /// List node IDs known to the account
    pub async fn list_nodes(&self) -> Vec<String> {
        let output = self.runner.run(&args(["getnodes"])).await;
        parse_node_list(&output)
    }

    /// Fetch the raw detail document for a node
    ///
    /// # Errors
    ///
    /// Returns [`ParseFailure`] with the CLI text if it is not JSON
    pub async fn node_details(&self, node_id: &str) -> std::result::Result<Value, ParseFailure> {
        let output = self
            .runner
            .run(&args(["getnodedetails", node_id, "--raw"]))
            .await;
        parse_json_output(output)
    }

    /// Fetch current parameter values for a node
    ///
    /// # Errors
    ///
    /// Returns [`ParseFailure`] with the CLI text if it is not JSON
    pub async fn get_params(&self, node_id: &str) -> std::result::Result<Value, ParseFailure> {
        let output = self.runner.run(&args(["getparams", node_id])).await;
        parse_json_output(output)
    }

    /// Send new parameter values to a node
    ///
    /// # Errors
    ///
    /// Returns error if the payload cannot be serialized
    pub async fn set_params(&self, node_id: &str, data: &Value) -> Result<SetParamsOutcome> {
        let payload = serde_json::to_string(data)?;
        let output = self
            .runner
            .run(&args(["setparams", "--data", payload.as_str(), node_id]))
            .await;

        let success = set_params_succeeded(&output);
        if !success {
            tracing::warn!(node_id, output = %output, "setparams reported a failure");
        }
        Ok(SetParamsOutcome { success, output })
    }

    /// Fetch one node and decode the view a policy needs, or `None` if
    /// either step fails
    async fn decoded_details<T>(
        &self,
        node_id: &str,
        decode: fn(&Value) -> serde_json::Result<T>,
    ) -> Option<(Value, T)> {
        let value = match self.node_details(node_id).await {
            Ok(value) => value,
            Err(failure) => {
                tracing::warn!(node_id, error = %failure.reason, "error getting node details, skipping");
                return None;
            }
        };
        match decode(&value) {
            Ok(details) => Some((value, details)),
            Err(e) => {
                tracing::warn!(node_id, error = %e, "unexpected node details shape, skipping");
                None
            }
        }
    }

    /// Classify every node with the RainMaker policy
    ///
    /// Nodes are fetched one at a time; a node that cannot be fetched or
    /// decoded is skipped.
    pub async fn rainmaker_devices(&self) -> Vec<ClassifiedDevice> {
        let mut devices = Vec::new();
        for node_id in self.list_nodes().await {
            let Some((_, details)) = self
                .decoded_details(&node_id, NodeDetails::from_value)
                .await
            else {
                continue;
            };
            if let Some(device) = classify_rainmaker(&node_id, &details) {
                devices.push(device);
            }
        }
        devices
    }

    /// Tag every node with its device family
    ///
    /// Nodes are fetched one at a time; a node that cannot be fetched or
    /// decoded is skipped.
    pub async fn all_nodes(&self) -> Vec<NodeSummary> {
        let mut nodes = Vec::new();
        for node_id in self.list_nodes().await {
            let Some((value, view)) = self
                .decoded_details(&node_id, MatterView::from_value)
                .await
            else {
                continue;
            };
            let summary = classify_family(&node_id, &view);
            nodes.push(NodeSummary {
                node_id,
                device_type: summary.family,
                device_name: summary.name,
                details: value,
            });
        }
        nodes
    }
}
