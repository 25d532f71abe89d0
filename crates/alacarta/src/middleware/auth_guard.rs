//! Rejects catalog edits while no admin is logged in

use crate::actions::Action;
use crate::dispatcher::Dispatcher;
use crate::middleware::Middleware;
use crate::state::AdminState;

pub struct AuthGuardMiddleware;

impl AuthGuardMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AuthGuardMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware for AuthGuardMiddleware {
    fn handle(&mut self, action: &Action, state: &AdminState, _dispatcher: &Dispatcher) -> bool {
        if action.is_admin_mutation() && !state.is_authenticated {
            log::warn!("Rejected {:?}: not authenticated", action);
            return false;
        }
        true
    }
}
