//! Sync transport on top of the shared local storage
//!
//! The service reacts to three triggers: storage events raised by other
//! handles, a fixed polling interval, and the tab becoming visible again.
//! All of them read `admin_system_state` and forward the parsed envelope to
//! the listeners; deciding whether anything is new is up to the consumer.

use alacarta_storage::{ListenerId, LocalStorage, StorageEvent, StorageListener, ADMIN_STATE_KEY};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::{SubscriptionId, SyncEnvelope, SyncListener, SyncTransport};
use crate::state::{AdminState, DirtyFields, SyncField};

/// Default polling period
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Cross-tab sync over a [`LocalStorage`] medium
pub struct StorageSyncService<S: LocalStorage> {
    storage: S,
    origin: Uuid,
    listeners: Mutex<HashMap<SubscriptionId, SyncListener>>,
    next_subscription: AtomicU64,
    storage_listener: ListenerId,
    poller: Mutex<Option<JoinHandle<()>>>,
    destroyed: AtomicBool,
}

impl<S: LocalStorage + 'static> StorageSyncService<S> {
    /// Create the service with the default polling period
    pub fn new(storage: S) -> Arc<Self> {
        Self::with_poll_interval(storage, DEFAULT_POLL_INTERVAL)
    }

    /// Create the service, subscribe to storage events and start polling
    ///
    /// Polling needs a tokio runtime; without one the service only reacts to
    /// storage events and explicit `check_for_updates` calls.
    pub fn with_poll_interval(storage: S, poll_interval: Duration) -> Arc<Self> {
        let service = Arc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            let listener: StorageListener = Arc::new(move |event: &StorageEvent| {
                if event.key != ADMIN_STATE_KEY {
                    return;
                }
                if let Some(service) = weak.upgrade() {
                    service.on_storage_event(event);
                }
            });
            let storage_listener = storage.subscribe(listener);

            Self {
                storage,
                origin: Uuid::new_v4(),
                listeners: Mutex::new(HashMap::new()),
                next_subscription: AtomicU64::new(0),
                storage_listener,
                poller: Mutex::new(None),
                destroyed: AtomicBool::new(false),
            }
        });

        service.start_polling(poll_interval);
        log::info!("Sync service {} started", service.origin);
        service
    }

    fn start_polling(self: &Arc<Self>, period: Duration) {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                log::warn!("No tokio runtime, sync service will not poll storage");
                return;
            }
        };

        let weak = Arc::downgrade(self);
        let handle = runtime.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // First tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                match weak.upgrade() {
                    Some(service) => service.check_for_updates(),
                    None => break,
                }
            }
        });
        *self.poller.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
    }
}

impl<S: LocalStorage> StorageSyncService<S> {
    fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Acquire)
    }

    fn on_storage_event(&self, event: &StorageEvent) {
        if self.is_destroyed() {
            return;
        }
        match event.new_value.as_deref() {
            Some(json) => {
                if let Some(envelope) = parse_envelope(json) {
                    log::debug!(
                        "Storage event: envelope #{} from {}",
                        envelope.sequence,
                        envelope.origin
                    );
                    self.notify(&envelope);
                }
            }
            None => log::warn!("Admin state was removed from storage by another tab"),
        }
    }

    fn read_envelope(&self) -> Option<SyncEnvelope> {
        match self.storage.get_item(ADMIN_STATE_KEY) {
            Ok(Some(json)) => parse_envelope(&json),
            Ok(None) => None,
            Err(e) => {
                log::error!("Failed to read admin state: {}", e);
                None
            }
        }
    }

    fn notify(&self, envelope: &SyncEnvelope) {
        // Collect first so listeners may subscribe or broadcast themselves
        let listeners: Vec<SyncListener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        for listener in listeners {
            listener(envelope);
        }
    }

    /// Merge `snapshot` over the stored envelope
    ///
    /// Dirty fields are stamped with the new sequence. Clean fields keep
    /// whichever copy is newer.
    ///
    /// With nothing readable in storage the sequence is reseeded from the
    /// wall clock (microseconds), which puts it above every sequence handed
    /// out before the stored value was lost. Tabs that outlived the loss
    /// therefore still accept the new envelopes.
    fn merge_for_write(&self, snapshot: &AdminState, stored: Option<SyncEnvelope>) -> SyncEnvelope {
        let written_at = Utc::now();
        let sequence = match &stored {
            Some(stored) => stored.sequence.max(snapshot.applied_sequence) + 1,
            None => {
                let floor = reseed_floor(written_at);
                log::info!("No readable envelope in storage, reseeding sequence at {}", floor);
                (snapshot.applied_sequence + 1).max(floor)
            }
        };

        let mut state = snapshot.clone();
        if let Some(stored) = &stored {
            for field in SyncField::ALL {
                if snapshot.dirty.contains(field.flag()) {
                    continue;
                }
                if stored.state.versions.get(field) > snapshot.versions.get(field) {
                    log::debug!("Keeping newer {:?} from storage", field);
                    state.adopt_field(&stored.state, field);
                }
            }
        }
        for field in SyncField::ALL {
            if snapshot.dirty.contains(field.flag()) {
                state.versions.set(field, sequence);
            }
        }
        state.dirty = DirtyFields::empty();
        state.applied_sequence = 0;

        SyncEnvelope {
            sequence,
            origin: self.origin,
            written_at,
            state,
        }
    }
}

fn reseed_floor(at: DateTime<Utc>) -> u64 {
    u64::try_from(at.timestamp_micros()).unwrap_or(0)
}

fn parse_envelope(json: &str) -> Option<SyncEnvelope> {
    match SyncEnvelope::from_json(json) {
        Ok(envelope) => Some(envelope),
        Err(e) => {
            log::error!("Ignoring malformed admin state in storage: {}", e);
            None
        }
    }
}

impl<S: LocalStorage> SyncTransport for StorageSyncService<S> {
    fn origin(&self) -> Uuid {
        self.origin
    }

    fn subscribe(&self, listener: SyncListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        if self.is_destroyed() {
            log::warn!("Subscribe on destroyed sync service ignored");
            return id;
        }
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, listener);
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }

    fn broadcast(&self, snapshot: &AdminState) -> Option<SyncEnvelope> {
        if self.is_destroyed() {
            log::warn!("Broadcast on destroyed sync service ignored");
            return None;
        }

        let envelope = self.merge_for_write(snapshot, self.read_envelope());
        let json = match envelope.to_json() {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to serialize admin state: {}", e);
                return None;
            }
        };
        if let Err(e) = self.storage.set_item(ADMIN_STATE_KEY, &json) {
            log::error!("Failed to persist admin state: {}", e);
            return None;
        }

        log::debug!(
            "Broadcast envelope #{} ({} bytes)",
            envelope.sequence,
            json.len()
        );
        self.notify(&envelope);
        Some(envelope)
    }

    fn load(&self) -> Option<SyncEnvelope> {
        self.read_envelope()
    }

    fn check_for_updates(&self) {
        if self.is_destroyed() {
            return;
        }
        if let Some(envelope) = self.read_envelope() {
            self.notify(&envelope);
        }
    }

    fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::AcqRel) {
            log::debug!("Sync service {} already destroyed", self.origin);
            return;
        }
        if let Some(handle) = self
            .poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
        self.storage.unsubscribe(self.storage_listener);
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        log::info!("Sync service {} destroyed", self.origin);
    }
}

impl<S: LocalStorage> Drop for StorageSyncService<S> {
    fn drop(&mut self) {
        self.destroy();
    }
}
