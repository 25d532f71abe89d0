use crate::actions::AuthAction;
use crate::state::{AdminState, SyncField};

/// Reduce the authentication flag
pub fn reduce(mut state: AdminState, action: &AuthAction) -> AdminState {
    match action {
        AuthAction::LoginSucceeded { .. } => {
            state.is_authenticated = true;
            state.record_change(SyncField::Session);
        }
        AuthAction::Logout => {
            state.is_authenticated = false;
            state.record_change(SyncField::Session);
        }
    }
    state
}
