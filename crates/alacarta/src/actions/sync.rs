//! Sync actions
//!
//! Local broadcasts come back as `Committed`, envelopes seen by the sync
//! listener (from this tab or another) as `Received`.

use chrono::{DateTime, Utc};

use crate::sync::SyncEnvelope;

#[derive(Debug, Clone, PartialEq)]
pub enum SyncAction {
    /// Initial load of the stored envelope
    Hydrate(SyncEnvelope),
    /// Our own snapshot was written to storage as this envelope
    Committed(SyncEnvelope),
    /// An envelope arrived through the transport
    Received {
        envelope: SyncEnvelope,
        /// Written by another tab
        foreign: bool,
        at: DateTime<Utc>,
    },
    /// Remote sync round trip started
    RemoteStarted,
    RemoteCompleted { at: DateTime<Utc> },
    RemoteFailed { reason: String },
}
