//! Node detail documents returned by `getnodedetails <id> --raw`
//!
//! Two views decode the same document. [`NodeDetails`] feeds the RainMaker
//! device policy: every field is optional, and a field that is missing,
//! `null` or of an unexpected JSON type reads as absent. [`MatterView`]
//! feeds the all-nodes policy and decodes nothing but the Matter metadata.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Error marker reported when CLI output is not JSON
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse JSON";

/// CLI output that was expected to be JSON but was not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    /// Raw text returned by the CLI
    pub raw: String,
    /// Parser message
    pub reason: String,
}

/// Parse CLI output as JSON, keeping the raw text on failure
///
/// # Errors
///
/// Returns [`ParseFailure`] carrying the raw text if it is not valid JSON
pub fn parse_json_output(raw: String) -> Result<Value, ParseFailure> {
    serde_json::from_str(&raw).map_err(|e| ParseFailure {
        reason: e.to_string(),
        raw,
    })
}

/// Read a field, falling back to its default when it is `null` or has the
/// wrong shape
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Reject documents that are not JSON objects
fn require_object(value: &Value) -> serde_json::Result<()> {
    if value.is_object() {
        Ok(())
    } else {
        Err(serde_json::Error::custom("node details document is not a JSON object"))
    }
}

/// Render a scalar for display, strings without quotes
fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Top-level node detail document, as read by the RainMaker device policy
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeDetails {
    #[serde(default, deserialize_with = "lenient")]
    pub node_details: Vec<NodeDetail>,
}

impl NodeDetails {
    /// Decode the classification-relevant fields of a parsed document
    ///
    /// # Errors
    ///
    /// Returns error if the document is not a JSON object
    pub fn from_value(value: &Value) -> serde_json::Result<Self> {
        require_object(value)?;
        Self::deserialize(value)
    }

    /// First entry, if any
    #[must_use]
    pub fn first(&self) -> Option<&NodeDetail> {
        self.node_details.first()
    }
}

/// One entry of `node_details`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeDetail {
    /// `"pure_matter"`, a RainMaker variant, or absent for traditional nodes
    #[serde(default, deserialize_with = "lenient")]
    pub node_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_matter: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<NodeStatus>,
    #[serde(default, deserialize_with = "lenient")]
    pub metadata: Option<NodeMetadata>,
    #[serde(default, deserialize_with = "lenient")]
    pub config: Option<NodeConfig>,
    /// Only an object counts; `[]` and other shapes read as no params
    #[serde(default, deserialize_with = "lenient")]
    pub params: Option<Map<String, Value>>,
}

impl NodeDetail {
    /// `status.connectivity.connected`, defaulting to false
    #[must_use]
    pub fn connected(&self) -> bool {
        self.status
            .as_ref()
            .and_then(|s| s.connectivity.as_ref())
            .is_some_and(|c| c.connected)
    }

    /// `metadata.Matter`, if present
    #[must_use]
    pub fn matter(&self) -> Option<&MatterMetadata> {
        self.metadata.as_ref().and_then(|m| m.matter.as_ref())
    }

    /// Names of the node's parameters, in document key order
    #[must_use]
    pub fn param_names(&self) -> Vec<&str> {
        self.params
            .as_ref()
            .map(|p| p.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeStatus {
    #[serde(default, deserialize_with = "lenient")]
    pub connectivity: Option<Connectivity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Connectivity {
    #[serde(default, deserialize_with = "lenient")]
    pub connected: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeMetadata {
    #[serde(default, rename = "Matter", deserialize_with = "lenient")]
    pub matter: Option<MatterMetadata>,
}

/// Matter fabric metadata attached to Matter-capable nodes
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatterMetadata {
    #[serde(default, deserialize_with = "lenient")]
    pub is_rainmaker: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub device_name: Option<String>,
    /// Usually a numeric Matter device type, kept as raw JSON
    #[serde(default)]
    pub device_type: Option<Value>,
}

impl MatterMetadata {
    /// Device type rendered for display, `"unknown"` when absent
    #[must_use]
    pub fn device_type_label(&self) -> String {
        self.device_type
            .as_ref()
            .and_then(display_value)
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Node configuration as reported by traditional RainMaker firmware
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeConfig {
    #[serde(default, deserialize_with = "lenient")]
    pub info: Option<NodeInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    /// Firmware device type, usually a string such as `esp.device.light`
    #[serde(default, rename = "type")]
    pub kind: Option<Value>,
}

impl NodeInfo {
    /// Device type rendered for display
    #[must_use]
    pub fn kind_label(&self) -> Option<String> {
        self.kind.as_ref().and_then(display_value)
    }
}

/// The slice of a detail document read by the all-nodes policy
///
/// Only `node_details[].metadata.Matter` is decoded, so other fields never
/// affect it. The objects along that path must be objects when present: an
/// explicit `null` or a scalar there makes the document undecodable and the
/// node is skipped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatterView {
    #[serde(default)]
    pub node_details: Vec<MatterEntry>,
}

impl MatterView {
    /// Decode the Matter metadata of a parsed document
    ///
    /// # Errors
    ///
    /// Returns error if the document is not an object, or `node_details`,
    /// an entry, its `metadata` or `metadata.Matter` has the wrong shape
    pub fn from_value(value: &Value) -> serde_json::Result<Self> {
        require_object(value)?;
        Self::deserialize(value)
    }

    /// Matter metadata of the first entry, `None` without entries
    #[must_use]
    pub fn first(&self) -> Option<&MatterMetadata> {
        self.node_details.first().map(|e| &e.metadata.matter)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatterEntry {
    #[serde(default)]
    pub metadata: MatterHolder,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatterHolder {
    #[serde(default, rename = "Matter")]
    pub matter: MatterMetadata,
}
