//! Device classification
//!
//! Two independent policies exist and must stay separate:
//!
//! - [`classify_rainmaker`] backs `/rainmakernodes`. It walks an ordered
//!   set of heuristics to decide whether a node belongs to the RainMaker
//!   ecosystem and how to label it.
//! - [`classify_family`] backs `/allnodes`. It only looks at the Matter
//!   metadata of the first entry and tags the node `rainmaker`, `matter`
//!   or `unknown`.

use serde::Serialize;

use super::detail::{MatterView, NodeDetail, NodeDetails, NodeInfo};

/// `node_type` of Matter nodes with no RainMaker affiliation
pub const PURE_MATTER: &str = "pure_matter";

/// `node_type` reported for nodes that carry no `node_type` field
pub const TRADITIONAL_RAINMAKER: &str = "traditional_rainmaker";

/// Default type label for traditional devices
const RAINMAKER_DEVICE: &str = "RainMaker Device";

/// A node included in the RainMaker device view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedDevice {
    pub node_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub node_type: String,
    pub is_matter: bool,
    pub connected: bool,
}

/// First `n` characters of a node ID, used in fallback names
fn short_id(node_id: &str, n: usize) -> &str {
    node_id
        .char_indices()
        .nth(n)
        .map_or(node_id, |(idx, _)| &node_id[..idx])
}

/// Classify a node for the RainMaker device view
///
/// Entries are tried in order and the first one that yields a device wins;
/// the rest are ignored. Returns `None` if no entry qualifies.
#[must_use]
pub fn classify_rainmaker(node_id: &str, details: &NodeDetails) -> Option<ClassifiedDevice> {
    details
        .node_details
        .iter()
        .find_map(|entry| classify_entry(node_id, entry))
}

/// Apply the RainMaker heuristics to a single `node_details` entry
///
/// Branch order matters: the first matching rule decides.
#[must_use]
pub fn classify_entry(node_id: &str, entry: &NodeDetail) -> Option<ClassifiedDevice> {
    let node_type = entry.node_type.as_deref();
    if node_type == Some(PURE_MATTER) {
        return None;
    }

    let fallback_name = format!("{RAINMAKER_DEVICE} {}", short_id(node_id, 8));

    let (name, device_type) = if let (true, Some(metadata)) = (entry.is_matter, &entry.metadata) {
        let matter = metadata.matter.clone().unwrap_or_default();
        if !matter.is_rainmaker && node_type == Some(PURE_MATTER) {
            return None;
        }
        let label = format!(
            "RainMaker Matter Device (Type: {})",
            matter.device_type_label()
        );
        (matter.device_name.unwrap_or(fallback_name), label)
    } else if let Some(config) = &entry.config {
        let info = config.info.as_ref();
        let name = info
            .and_then(|i| i.name.clone())
            .unwrap_or(fallback_name);
        let params = entry.param_names();
        let label = if params.is_empty() {
            info.and_then(NodeInfo::kind_label)
                .unwrap_or_else(|| RAINMAKER_DEVICE.to_string())
        } else {
            format!("{RAINMAKER_DEVICE} ({})", params.join(", "))
        };
        (name, label)
    } else if let Some(kind) = node_type {
        (fallback_name, format!("{RAINMAKER_DEVICE} ({kind})"))
    } else {
        tracing::debug!(node_id, "unrecognised node structure, skipping");
        return None;
    };

    Some(ClassifiedDevice {
        node_id: node_id.to_string(),
        name,
        device_type,
        node_type: node_type.unwrap_or(TRADITIONAL_RAINMAKER).to_string(),
        is_matter: entry.is_matter,
        connected: entry.connected(),
    })
}

/// Coarse device family used by the all-nodes view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceFamily {
    Rainmaker,
    Matter,
    Unknown,
}

/// Family tag and display name for a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilySummary {
    pub family: DeviceFamily,
    pub name: String,
}

/// Classify a node for the all-nodes view
///
/// Only the first entry is inspected. A node without entries is `Unknown`.
#[must_use]
pub fn classify_family(node_id: &str, view: &MatterView) -> FamilySummary {
    let fallback_name = format!("Node {}", short_id(node_id, 8));

    let Some(matter) = view.first() else {
        return FamilySummary {
            family: DeviceFamily::Unknown,
            name: fallback_name,
        };
    };

    let family = if matter.is_rainmaker {
        DeviceFamily::Rainmaker
    } else {
        DeviceFamily::Matter
    };
    let name = matter.device_name.clone().unwrap_or(fallback_name);

    FamilySummary { family, name }
}
