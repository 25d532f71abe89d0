//! `admin_state_change` events
//!
//! Same-process observers (a storefront view, the `watch` command) learn about
//! admin edits from these events without holding a reference to the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display};
use tokio::sync::broadcast;

/// Source tag carried by every event
pub const ADMIN_PANEL_SOURCE: &str = "admin_panel";

const FEED_CAPACITY: usize = 64;

/// What kind of edit happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChangeType {
    Prices,
    DeliveryZoneAdd,
    DeliveryZoneUpdate,
    DeliveryZoneDelete,
    NovelAdd,
    NovelUpdate,
    NovelDelete,
}

/// Payload of an `admin_state_change` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminChangeEvent {
    #[serde(rename = "type")]
    pub change: ChangeType,
    pub data: Value,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

impl AdminChangeEvent {
    pub fn new(change: ChangeType, data: Value, timestamp: DateTime<Utc>) -> Self {
        Self {
            change,
            data,
            timestamp,
            source: ADMIN_PANEL_SOURCE.to_string(),
        }
    }
}

/// Broadcast channel of admin change events
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<AdminChangeEvent>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(FEED_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AdminChangeEvent> {
        self.tx.subscribe()
    }

    /// Publish to current subscribers. Nobody listening is fine.
    pub fn publish(&self, event: AdminChangeEvent) {
        match self.tx.send(event) {
            Ok(receivers) => log::trace!("Change event delivered to {} receivers", receivers),
            Err(_) => log::trace!("Change event dropped, no receivers"),
        }
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}
