use crate::actions::BackupAction;
use crate::state::{AdminState, SyncField};

pub fn reduce(mut state: AdminState, action: &BackupAction) -> AdminState {
    match action {
        BackupAction::Exported { at, .. } => {
            state.last_backup = Some(*at);
            state.record_change(SyncField::Session);
        }

        // The catalog is replaced; session, notifications and sync
        // bookkeeping stay local. One restore is one admin change.
        BackupAction::Restored { state: backup, .. } => {
            state.prices = backup.prices;
            state.delivery_zones = backup.delivery_zones.clone();
            state.novels = backup.novels.clone();
            state.record_admin_change(SyncField::Prices);
            state.record_change(SyncField::DeliveryZones);
            state.record_change(SyncField::Novels);
        }

        BackupAction::Started
        | BackupAction::Failed { .. }
        | BackupAction::RestoreFailed { .. } => {}
    }
    state
}
