use crate::actions::NotificationAction;
use crate::state::{AdminState, SyncField};

/// Notifications are persisted but never count as pending admin changes
pub fn reduce(mut state: AdminState, action: &NotificationAction) -> AdminState {
    match action {
        NotificationAction::Add(notification) => {
            state.notifications.push(notification.clone());
        }
        NotificationAction::Clear => {
            state.notifications.clear();
        }
    }
    state.record_change(SyncField::Notifications);
    state
}
