use crate::actions::Action;
use crate::dispatcher::Dispatcher;
use crate::middleware::Middleware;
use crate::state::AdminState;

/// LoggingMiddleware - logs all actions passing through
pub struct LoggingMiddleware;

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware for LoggingMiddleware {
    fn handle(&mut self, action: &Action, _state: &AdminState, _dispatcher: &Dispatcher) -> bool {
        // Envelopes carry the whole state, keep those lines short
        match action {
            Action::Sync(crate::actions::SyncAction::Received {
                envelope, foreign, ..
            }) => log::debug!(
                "Action: Sync(Received #{} foreign={})",
                envelope.sequence,
                foreign
            ),
            Action::Sync(crate::actions::SyncAction::Committed(envelope)) => {
                log::debug!("Action: Sync(Committed #{})", envelope.sequence)
            }
            Action::Sync(crate::actions::SyncAction::Hydrate(envelope)) => {
                log::debug!("Action: Sync(Hydrate #{})", envelope.sequence)
            }
            _ => log::debug!("Action: {:?}", action),
        }

        true // Always pass action through
    }
}
