//! RainMaker Gateway - HTTP API for ESP RainMaker nodes
//!
//! Exposes the `esp-rainmaker-cli` tool over HTTP:
//! - Session management (login on demand)
//! - Node listing, details and parameter get/set
//! - Device classification (traditional, RainMaker Matter, pure Matter)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    HTTP clients                      │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                 RainMaker Gateway                    │
//! │   API  │  Session  │  Node list  │  Classifier      │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │               esp-rainmaker-cli                      │
//! │            ESP RainMaker cloud                       │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod rainmaker;

pub use api::{ApiServer, ApiState};
pub use cli::{CommandOutput, CommandRunner, ProcessRunner};
pub use config::{Config, Credentials, resolve_profile};
pub use error::{Error, Result};
pub use rainmaker::{ClassifiedDevice, DeviceFamily, RainmakerClient};
