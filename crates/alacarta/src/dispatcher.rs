//! Dispatcher for follow-up actions
//!
//! Middleware and sync listeners never touch the store directly. They send
//! actions through a `Dispatcher`; the store drains the channel after each
//! dispatch, so queued actions run through the full middleware chain in the
//! order they were sent.
//!
//! This enables patterns like:
//! - `NotificationAction::Clear` triggers the "cleared" notification
//! - A storage event from another tab becomes a `SyncAction::Received`

use crate::actions::Action;
use std::sync::mpsc::Sender;

/// Dispatcher for sending actions back into the store
#[derive(Clone)]
pub struct Dispatcher {
    action_tx: Sender<Action>,
}

impl Dispatcher {
    /// Create a new dispatcher with the store's action channel
    pub fn new(action_tx: Sender<Action>) -> Self {
        Self { action_tx }
    }

    /// Queue an action for the store
    pub fn dispatch(&self, action: Action) {
        if let Err(e) = self.action_tx.send(action) {
            log::error!("Dispatcher: failed to send action: {}", e);
        }
    }
}
