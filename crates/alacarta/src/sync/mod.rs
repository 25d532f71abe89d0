//! Cross-tab synchronization
//!
//! Every tab owns one [`SyncTransport`]. The store hands it a snapshot after
//! each batch of changes; the transport persists a [`SyncEnvelope`] and tells
//! every listener (the store itself included) about it. Envelopes written by
//! other tabs arrive through the same listeners.
//!
//! ```text
//!  Store ──broadcast(snapshot)──▶ SyncTransport ──set_item──▶ LocalStorage
//!    ▲                                 │                          │
//!    └────── listener(envelope) ◀──────┴── storage event / poll ◀─┘
//! ```

mod envelope;
mod storage_sync;

pub use envelope::SyncEnvelope;
pub use storage_sync::StorageSyncService;

use crate::state::AdminState;
use std::sync::Arc;
use uuid::Uuid;

/// Callback receiving every envelope the transport sees
pub type SyncListener = Arc<dyn Fn(&SyncEnvelope) + Send + Sync>;

/// Handle for detaching a listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Persistence and fan-out of admin snapshots between tabs
pub trait SyncTransport: Send + Sync {
    /// Identity of this tab, written into every envelope it broadcasts
    fn origin(&self) -> Uuid;

    fn subscribe(&self, listener: SyncListener) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId);

    /// Persist `snapshot` and notify listeners
    ///
    /// Fields not marked dirty in the snapshot are taken from the stored
    /// envelope when the stored copy is newer. Returns the envelope written,
    /// or `None` when nothing could be persisted.
    fn broadcast(&self, snapshot: &AdminState) -> Option<SyncEnvelope>;

    /// Read the stored envelope without notifying anyone
    fn load(&self) -> Option<SyncEnvelope>;

    /// Read the stored envelope and forward it to all listeners
    fn check_for_updates(&self);

    /// Tabs catch up when they become visible again
    fn on_visibility_change(&self, visible: bool) {
        if visible {
            self.check_for_updates();
        }
    }

    /// Stop polling and drop all listeners. Safe to call more than once.
    fn destroy(&self);
}
