//! Admin aggregate root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    DeliveryZone, DirtyFields, FieldVersions, Novel, NotificationLog, PriceConfig, SyncField,
    SyncStatus,
};

/// Admin state
///
/// Every read goes through this struct and only the reducer produces new
/// values of it. Serialized with the storefront's camelCase field names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminState {
    pub is_authenticated: bool,
    pub prices: PriceConfig,
    pub delivery_zones: Vec<DeliveryZone>,
    pub novels: Vec<Novel>,
    pub notifications: NotificationLog,
    pub last_backup: Option<DateTime<Utc>>,
    pub sync_status: SyncStatus,
    #[serde(default)]
    pub versions: FieldVersions,
    /// Fields changed since the last successful broadcast
    #[serde(skip)]
    pub dirty: DirtyFields,
    /// Sequence of the last storage envelope written or merged by this tab
    #[serde(skip)]
    pub applied_sequence: u64,
}

impl AdminState {
    /// Record an admin mutation: marks the field dirty and counts a pending change
    pub fn record_admin_change(&mut self, field: SyncField) {
        self.dirty |= field.flag();
        self.sync_status.pending_changes = self.sync_status.pending_changes.saturating_add(1);
    }

    /// Record a change that must be persisted but is not an admin edit
    pub fn record_change(&mut self, field: SyncField) {
        self.dirty |= field.flag();
    }

    /// Take `field` (value and version) from another snapshot
    pub fn adopt_field(&mut self, other: &AdminState, field: SyncField) {
        match field {
            SyncField::Prices => self.prices = other.prices,
            SyncField::DeliveryZones => self.delivery_zones = other.delivery_zones.clone(),
            SyncField::Novels => self.novels = other.novels.clone(),
            SyncField::Notifications => self.notifications = other.notifications.clone(),
            SyncField::Session => {
                self.is_authenticated = other.is_authenticated;
                self.last_backup = other.last_backup;
            }
        }
        self.versions.set(field, other.versions.get(field));
    }

    pub fn find_delivery_zone(&self, id: u64) -> Option<&DeliveryZone> {
        self.delivery_zones.iter().find(|zone| zone.id == id)
    }

    /// Zones offered at checkout
    pub fn active_delivery_zones(&self) -> impl Iterator<Item = &DeliveryZone> {
        self.delivery_zones.iter().filter(|zone| zone.active)
    }

    pub fn find_novel(&self, id: u64) -> Option<&Novel> {
        self.novels.iter().find(|novel| novel.id == id)
    }
}
