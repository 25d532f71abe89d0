//! Delivery Zone Reducer
//!
//! Updates and deletes of unknown ids leave the state untouched: no pending
//! change, nothing marked dirty.

use crate::actions::DeliveryZoneAction;
use crate::state::{AdminState, DeliveryZone, SyncField};

pub fn reduce(mut state: AdminState, action: &DeliveryZoneAction) -> AdminState {
    match action {
        DeliveryZoneAction::Add(zone) => {
            state.delivery_zones.push(zone.clone());
            state.record_admin_change(SyncField::DeliveryZones);
        }

        DeliveryZoneAction::Update(zone) => {
            match state.delivery_zones.iter_mut().find(|z| z.id == zone.id) {
                Some(existing) => {
                    *existing = DeliveryZone {
                        created_at: existing.created_at,
                        ..zone.clone()
                    };
                    state.record_admin_change(SyncField::DeliveryZones);
                }
                None => log::warn!("Update of unknown delivery zone {} ignored", zone.id),
            }
        }

        DeliveryZoneAction::Delete(id) => {
            let before = state.delivery_zones.len();
            state.delivery_zones.retain(|zone| zone.id != *id);
            if state.delivery_zones.len() < before {
                state.record_admin_change(SyncField::DeliveryZones);
            } else {
                log::warn!("Delete of unknown delivery zone {} ignored", id);
            }
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::NewDeliveryZone;
    use chrono::Utc;

    #[test]
    fn test_delete_keeps_order() {
        let now = Utc::now();
        let mut state = AdminState::default();
        for (id, name) in [(1, "Centro"), (2, "Vedado"), (3, "Playa")] {
            state = reduce(
                state,
                &DeliveryZoneAction::Add(DeliveryZone::create(id, NewDeliveryZone::new(name, 100), now)),
            );
        }

        let state = reduce(state, &DeliveryZoneAction::Delete(2));
        let names: Vec<&str> = state.delivery_zones.iter().map(|z| z.name.as_str()).collect();
        assert_eq!(names, vec!["Centro", "Playa"]);
        assert_eq!(state.sync_status.pending_changes, 4);
    }

    #[test]
    fn test_update_unknown_zone_is_noop() {
        let zone = DeliveryZone::create(5, NewDeliveryZone::new("Regla", 200), Utc::now());
        let state = reduce(AdminState::default(), &DeliveryZoneAction::Update(zone));

        assert_eq!(state, AdminState::default());
    }
}
