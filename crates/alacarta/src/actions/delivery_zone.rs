//! Delivery zone actions

use crate::state::DeliveryZone;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryZoneAction {
    /// Append a fully stamped zone
    Add(DeliveryZone),
    /// Replace the zone with the same id (its `updated_at` is already fresh)
    Update(DeliveryZone),
    /// Remove the zone with this id
    Delete(u64),
}
