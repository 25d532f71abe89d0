use crate::actions::Action;
use crate::reducers::{
    auth_reducer, backup_reducer, delivery_zone_reducer, notification_reducer, novel_reducer,
    prices_reducer, sync_reducer,
};
use crate::state::AdminState;

/// Reducer - pure function that produces new state from current state + action
/// This is the root reducer that routes each action to its domain reducer
pub fn reduce(state: AdminState, action: &Action) -> AdminState {
    match action {
        Action::Auth(action) => auth_reducer::reduce(state, action),
        Action::Prices(action) => prices_reducer::reduce(state, action),
        Action::DeliveryZone(action) => delivery_zone_reducer::reduce(state, action),
        Action::Novel(action) => novel_reducer::reduce(state, action),
        Action::Notification(action) => notification_reducer::reduce(state, action),
        Action::Sync(action) => sync_reducer::reduce(state, action),
        Action::Backup(action) => backup_reducer::reduce(state, action),
        Action::None => state,
    }
}
