//! In-memory storage shared between tab handles
//!
//! All handles opened from the same `MemoryStorage` see one map. A write
//! through one handle raises a `StorageEvent` on every *other* handle, which
//! is how two simulated tabs observe each other without polling.

use crate::{ListenerId, LocalStorage, StorageError, StorageEvent, StorageListener};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

struct Registration {
    handle: u64,
    id: ListenerId,
    listener: StorageListener,
}

struct Shared {
    data: Mutex<HashMap<String, String>>,
    listeners: Mutex<Vec<Registration>>,
    next_handle: AtomicU64,
    next_listener: AtomicU64,
    /// Maximum total size of keys and values in bytes
    quota: Option<usize>,
}

/// A tab's handle onto a shared in-memory medium
///
/// Cloning keeps the same handle (same tab). Use [`MemoryStorage::open_tab`]
/// to get a handle that receives the events of this one.
#[derive(Clone)]
pub struct MemoryStorage {
    shared: Arc<Shared>,
    handle: u64,
}

impl MemoryStorage {
    /// Create a new, empty medium without a size limit
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create a medium that rejects writes growing it beyond `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        Self::build(Some(bytes))
    }

    fn build(quota: Option<usize>) -> Self {
        Self {
            shared: Arc::new(Shared {
                data: Mutex::new(HashMap::new()),
                listeners: Mutex::new(Vec::new()),
                next_handle: AtomicU64::new(1),
                next_listener: AtomicU64::new(0),
                quota,
            }),
            handle: 0,
        }
    }

    /// Open another handle onto the same medium
    pub fn open_tab(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            handle: self.shared.next_handle.fetch_add(1, Ordering::Relaxed),
        }
    }

    fn notify_other_tabs(&self, event: StorageEvent) {
        // Collect first so listeners may touch the storage without deadlocking
        let listeners: Vec<StorageListener> = self
            .shared
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|registration| registration.handle != self.handle)
            .map(|registration| Arc::clone(&registration.listener))
            .collect();

        for listener in listeners {
            listener(&event);
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStorage")
            .field("handle", &self.handle)
            .field("quota", &self.shared.quota)
            .finish()
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let data = self
            .shared
            .data
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(data.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let old_value = {
            let mut data = self
                .shared
                .data
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            if let Some(quota) = self.shared.quota {
                let used: usize = data
                    .iter()
                    .filter(|(k, _)| k.as_str() != key)
                    .map(|(k, v)| k.len() + v.len())
                    .sum();
                let requested = key.len() + value.len();
                if used + requested > quota {
                    return Err(StorageError::QuotaExceeded {
                        key: key.to_string(),
                        requested,
                        available: quota.saturating_sub(used),
                    });
                }
            }

            data.insert(key.to_string(), value.to_string())
        };

        self.notify_other_tabs(StorageEvent {
            key: key.to_string(),
            old_value,
            new_value: Some(value.to_string()),
        });
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let old_value = self
            .shared
            .data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);

        if old_value.is_some() {
            self.notify_other_tabs(StorageEvent {
                key: key.to_string(),
                old_value,
                new_value: None,
            });
        }
        Ok(())
    }

    fn subscribe(&self, listener: StorageListener) -> ListenerId {
        let id = ListenerId(self.shared.next_listener.fetch_add(1, Ordering::Relaxed));
        self.shared
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Registration {
                handle: self.handle,
                id,
                listener,
            });
        id
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.shared
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|registration| registration.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_listener() -> (StorageListener, Arc<Mutex<Vec<StorageEvent>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let listener: StorageListener = Arc::new(move |event: &StorageEvent| {
            sink.lock().unwrap().push(event.clone());
        });
        (listener, seen)
    }

    #[test]
    fn test_tabs_share_values() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.open_tab();

        tab_a.set_item("movieCart", "[]").unwrap();
        assert_eq!(tab_b.get_item("movieCart").unwrap().as_deref(), Some("[]"));

        tab_b.remove_item("movieCart").unwrap();
        assert_eq!(tab_a.get_item("movieCart").unwrap(), None);
    }

    #[test]
    fn test_events_reach_other_tabs_only() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.open_tab();
        let (listener_a, seen_a) = recording_listener();
        let (listener_b, seen_b) = recording_listener();
        tab_a.subscribe(listener_a);
        tab_b.subscribe(listener_b);

        tab_a.set_item("k", "1").unwrap();
        tab_a.set_item("k", "2").unwrap();

        assert!(seen_a.lock().unwrap().is_empty());
        let events = seen_b.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].old_value.as_deref(), Some("1"));
        assert_eq!(events[1].new_value.as_deref(), Some("2"));
    }

    #[test]
    fn test_unsubscribe_detaches_listener() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.open_tab();
        let (listener, seen) = recording_listener();
        let id = tab_b.subscribe(listener);
        tab_b.unsubscribe(id);

        tab_a.set_item("k", "v").unwrap();
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_quota_rejects_oversized_write() {
        let storage = MemoryStorage::with_quota(16);
        storage.set_item("a", "0123456789").unwrap();

        let err = storage.set_item("b", "0123456789").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert_eq!(storage.get_item("b").unwrap(), None);

        // Overwriting an existing key only counts the new value
        storage.set_item("a", "012345678901234").unwrap();
    }
}
