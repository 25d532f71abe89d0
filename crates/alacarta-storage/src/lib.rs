//! Shared key/value storage for TV a la Carta
//!
//! Every tab of the storefront reads and writes one storage medium. This crate
//! provides the `LocalStorage` trait plus two backends:
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │            LocalStorage trait             │
//! │  - get_item() / set_item() / remove_item()│
//! │  - subscribe() / unsubscribe()            │
//! └───────────────────────────────────────────┘
//!                      │
//!       ┌──────────────┴──────────────┐
//!       ▼                             ▼
//! ┌──────────────┐          ┌───────────────────┐
//! │ FileStorage  │          │ MemoryStorage     │
//! │ (one file    │          │ (shared map, one  │
//! │  per key)    │          │  handle per tab)  │
//! └──────────────┘          └───────────────────┘
//! ```
//!
//! Storage events follow browser semantics: a write is announced to the
//! *other* handles sharing the medium, never to the handle that wrote it.

pub mod error;
pub mod file_storage;
pub mod keys;
pub mod memory_storage;

pub use error::StorageError;
pub use file_storage::FileStorage;
pub use keys::{ADMIN_STATE_KEY, CART_KEY};
pub use memory_storage::MemoryStorage;

use std::sync::Arc;

/// A change made to the medium by another handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// Callback invoked for every storage event
pub type StorageListener = Arc<dyn Fn(&StorageEvent) + Send + Sync>;

/// Handle returned by `subscribe`, used to detach the listener again
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

/// Key/value storage shared between tabs
///
/// Implementations must be `Send + Sync`: the sync service polls from a
/// background task while the owning store writes from the foreground.
pub trait LocalStorage: Send + Sync {
    /// Read the value stored under `key`
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Register a listener for changes made by other handles
    fn subscribe(&self, listener: StorageListener) -> ListenerId;

    /// Detach a listener. Unknown ids are ignored.
    fn unsubscribe(&self, id: ListenerId);
}

impl<T: LocalStorage + ?Sized> LocalStorage for Arc<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }

    fn subscribe(&self, listener: StorageListener) -> ListenerId {
        (**self).subscribe(listener)
    }

    fn unsubscribe(&self, id: ListenerId) {
        (**self).unsubscribe(id)
    }
}
