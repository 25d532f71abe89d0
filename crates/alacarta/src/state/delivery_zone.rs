//! Delivery zones offered at checkout

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A delivery zone with its delivery cost
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryZone {
    pub id: u64,
    pub name: String,
    pub cost: u32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDeliveryZone {
    pub name: String,
    pub cost: u32,
    pub active: bool,
}

impl NewDeliveryZone {
    /// An active zone
    pub fn new(name: impl Into<String>, cost: u32) -> Self {
        Self {
            name: name.into(),
            cost,
            active: true,
        }
    }
}

impl DeliveryZone {
    pub fn create(id: u64, zone: NewDeliveryZone, at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: zone.name,
            cost: zone.cost,
            active: zone.active,
            created_at: at,
            updated_at: at,
        }
    }
}
