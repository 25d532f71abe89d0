//! Remote sync
//!
//! The storefront has no real backend; the admin "sync" button only simulates
//! a round trip. [`RemoteSync`] keeps that seam explicit so the store can be
//! tested against both outcomes.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::state::AdminState;

/// Errors reported by a remote sync backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteSyncError {
    #[error("remote unreachable: {0}")]
    Unreachable(String),
}

/// Remote sync backend
///
/// Implementations must be `Send + Sync` so the store can await them from
/// any task.
#[async_trait]
pub trait RemoteSync: Send + Sync {
    /// Push the given snapshot to the remote
    async fn push(&self, snapshot: &AdminState) -> Result<(), RemoteSyncError>;
}

/// Remote that waits a fixed delay and then succeeds
///
/// Built with [`SimulatedRemote::failing`] it fails instead, after the same
/// delay.
#[derive(Debug, Clone)]
pub struct SimulatedRemote {
    delay: Duration,
    fail: bool,
}

impl SimulatedRemote {
    pub fn new(delay: Duration) -> Self {
        Self { delay, fail: false }
    }

    pub fn failing(delay: Duration) -> Self {
        Self { delay, fail: true }
    }
}

impl Default for SimulatedRemote {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[async_trait]
impl RemoteSync for SimulatedRemote {
    async fn push(&self, snapshot: &AdminState) -> Result<(), RemoteSyncError> {
        log::debug!(
            "Simulated remote sync: {} zones, {} novels, waiting {:?}",
            snapshot.delivery_zones.len(),
            snapshot.novels.len(),
            self.delay
        );
        tokio::time::sleep(self.delay).await;

        if self.fail {
            return Err(RemoteSyncError::Unreachable(
                "simulated network failure".to_string(),
            ));
        }
        Ok(())
    }
}
