//! ESP RainMaker node discovery and classification
//!
//! Turns `esp-rainmaker-cli` text output into node IDs, detail documents
//! and classified devices.

pub mod classify;
pub mod client;
pub mod detail;
pub mod node_list;
pub mod session;

pub use classify::{
    ClassifiedDevice, DeviceFamily, FamilySummary, classify_entry, classify_family,
    classify_rainmaker,
};
pub use client::{NodeSummary, RainmakerClient, SetParamsOutcome, set_params_succeeded};
pub use detail::{MatterView, NodeDetail, NodeDetails, PARSE_FAILURE_MESSAGE, ParseFailure};
pub use node_list::{Line, classify_line, is_plausible_node_id, parse_node_list};
pub use session::{ensure_authenticated, needs_login};
