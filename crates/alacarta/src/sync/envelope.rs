//! Versioned admin snapshot as written to storage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AdminState;

/// What lives under `admin_system_state`
///
/// The state is flattened next to the envelope fields, so the stored JSON
/// still reads like a plain admin snapshot with a few extra keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncEnvelope {
    /// Storage write counter, grows by one with every broadcast from any tab
    #[serde(default)]
    pub sequence: u64,
    /// Tab that wrote this envelope
    #[serde(default)]
    pub origin: Uuid,
    #[serde(default = "Utc::now")]
    pub written_at: DateTime<Utc>,
    #[serde(flatten)]
    pub state: AdminState,
}

impl SyncEnvelope {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
