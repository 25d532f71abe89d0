use crate::actions::{Action, DeliveryZoneAction, NovelAction};
use crate::dispatcher::Dispatcher;
use crate::state::AdminState;

pub mod auth_guard;
pub mod change_event;
pub mod logging;
pub mod notification;

/// Middleware trait - sees every action before and after the reducer
///
/// `handle` runs before the reducer and may consume the action. `after_reduce`
/// runs only for actions that reached the reducer and gets both states, so
/// middleware can react to what actually changed.
pub trait Middleware: Send {
    /// Handle an action
    ///
    /// - `action`: The action to process
    /// - `state`: Current admin state (read-only snapshot)
    /// - `dispatcher`: Use to queue follow-up actions
    ///
    /// Returns `true` to continue chain, `false` to consume action
    fn handle(&mut self, action: &Action, state: &AdminState, dispatcher: &Dispatcher) -> bool;

    /// Observe the result of a reduced action
    fn after_reduce(
        &mut self,
        _action: &Action,
        _previous: &AdminState,
        _state: &AdminState,
        _dispatcher: &Dispatcher,
    ) {
    }
}

/// Whether an admin mutation changed anything
///
/// Updates and deletes that name an unknown id are no-ops. Everything else
/// counts.
pub(crate) fn is_effective(action: &Action, previous: &AdminState) -> bool {
    match action {
        Action::DeliveryZone(DeliveryZoneAction::Update(zone)) => {
            previous.find_delivery_zone(zone.id).is_some()
        }
        Action::DeliveryZone(DeliveryZoneAction::Delete(id)) => {
            previous.find_delivery_zone(*id).is_some()
        }
        Action::Novel(NovelAction::Update(novel)) => previous.find_novel(novel.id).is_some(),
        Action::Novel(NovelAction::Delete(id)) => previous.find_novel(*id).is_some(),
        _ => true,
    }
}
