//! Sync bookkeeping: status, per-field versions and the dirty set

use bitflags::bitflags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Connectivity and pending-change counters shown in the admin panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub is_online: bool,
    pub last_sync: Option<DateTime<Utc>>,
    /// Admin mutations since the last full sync
    pub pending_changes: u32,
}

impl Default for SyncStatus {
    fn default() -> Self {
        Self {
            is_online: true,
            last_sync: None,
            pending_changes: 0,
        }
    }
}

/// The independently synced parts of the admin state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncField {
    Prices,
    DeliveryZones,
    Novels,
    Notifications,
    /// Authentication flag and last backup time
    Session,
}

impl SyncField {
    pub const ALL: [SyncField; 5] = [
        SyncField::Prices,
        SyncField::DeliveryZones,
        SyncField::Novels,
        SyncField::Notifications,
        SyncField::Session,
    ];

    pub fn flag(self) -> DirtyFields {
        match self {
            SyncField::Prices => DirtyFields::PRICES,
            SyncField::DeliveryZones => DirtyFields::DELIVERY_ZONES,
            SyncField::Novels => DirtyFields::NOVELS,
            SyncField::Notifications => DirtyFields::NOTIFICATIONS,
            SyncField::Session => DirtyFields::SESSION,
        }
    }
}

bitflags! {
    /// Fields changed locally that have not been written to storage yet
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DirtyFields: u8 {
        const PRICES = 1 << 0;
        const DELIVERY_ZONES = 1 << 1;
        const NOVELS = 1 << 2;
        const NOTIFICATIONS = 1 << 3;
        const SESSION = 1 << 4;
    }
}

/// Storage write sequence at which each field was last written
///
/// A field from an incoming snapshot is applied only when its version is
/// newer than the local one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldVersions {
    pub prices: u64,
    pub delivery_zones: u64,
    pub novels: u64,
    pub notifications: u64,
    pub session: u64,
}

impl FieldVersions {
    pub fn get(&self, field: SyncField) -> u64 {
        match field {
            SyncField::Prices => self.prices,
            SyncField::DeliveryZones => self.delivery_zones,
            SyncField::Novels => self.novels,
            SyncField::Notifications => self.notifications,
            SyncField::Session => self.session,
        }
    }

    pub fn set(&mut self, field: SyncField, version: u64) {
        match field {
            SyncField::Prices => self.prices = version,
            SyncField::DeliveryZones => self.delivery_zones = version,
            SyncField::Novels => self.novels = version,
            SyncField::Notifications => self.notifications = version,
            SyncField::Session => self.session = version,
        }
    }
}
