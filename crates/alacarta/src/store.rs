//! Admin store
//!
//! Holds the admin state and runs the Redux loop: middleware chain, root
//! reducer, post-reduce middleware. After every dispatch the store drains
//! queued follow-up actions and writes the resulting snapshot through the
//! sync transport once, so an edit and its notification land in storage as a
//! single envelope.

use std::path::Path;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

use crate::actions::{
    Action, AuthAction, BackupAction, DeliveryZoneAction, NotificationAction, NovelAction,
    PricesAction, SyncAction,
};
use crate::dispatcher::Dispatcher;
use crate::events::ChangeFeed;
use crate::export;
use crate::middleware::auth_guard::AuthGuardMiddleware;
use crate::middleware::change_event::ChangeEventMiddleware;
use crate::middleware::logging::LoggingMiddleware;
use crate::middleware::notification::NotificationMiddleware;
use crate::middleware::Middleware;
use crate::reducers::admin_reducer::reduce;
use crate::remote::RemoteSync;
use crate::stamp::{Clock, IdGenerator};
use crate::state::{
    AdminState, DeliveryZone, NewDeliveryZone, NewNovel, NotificationDraft, Novel, PriceConfig,
};
use crate::sync::{SubscriptionId, SyncEnvelope, SyncTransport};

/// The one username/password pair accepted by `login`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new("admin", "admin123")
    }
}

/// Collaborators injected by the composition root
pub struct StoreServices {
    pub transport: Arc<dyn SyncTransport>,
    pub remote: Arc<dyn RemoteSync>,
    pub clock: Arc<dyn Clock>,
    pub ids: Arc<dyn IdGenerator>,
    pub credentials: Credentials,
}

/// Store - holds admin state and manages the Redux loop
pub struct Store {
    state: AdminState,
    middleware: Vec<Box<dyn Middleware>>,
    dispatcher: Dispatcher,
    action_rx: Receiver<Action>,
    services: StoreServices,
    changes: ChangeFeed,
    subscription: SubscriptionId,
}

impl Store {
    /// Create a store, hydrate it from storage and subscribe to sync
    ///
    /// Installs the standard middleware chain (logging, auth guard,
    /// notifications, change events). More can be appended with
    /// [`Store::add_middleware`].
    pub fn new(services: StoreServices) -> Self {
        let (action_tx, action_rx) = channel();
        let dispatcher = Dispatcher::new(action_tx);
        let changes = ChangeFeed::new();

        let listener_dispatcher = dispatcher.clone();
        let listener_clock = Arc::clone(&services.clock);
        let origin = services.transport.origin();
        let subscription = services
            .transport
            .subscribe(Arc::new(move |envelope: &SyncEnvelope| {
                listener_dispatcher.dispatch(Action::Sync(SyncAction::Received {
                    envelope: envelope.clone(),
                    foreign: envelope.origin != origin,
                    at: listener_clock.now(),
                }));
            }));

        let mut store = Self {
            state: AdminState::default(),
            middleware: Vec::new(),
            dispatcher,
            action_rx,
            changes: changes.clone(),
            subscription,
            services,
        };

        store.add_middleware(Box::new(LoggingMiddleware::new()));
        store.add_middleware(Box::new(AuthGuardMiddleware::new()));
        store.add_middleware(Box::new(NotificationMiddleware::new(
            Arc::clone(&store.services.clock),
            Arc::clone(&store.services.ids),
        )));
        store.add_middleware(Box::new(ChangeEventMiddleware::new(
            changes,
            Arc::clone(&store.services.clock),
        )));

        match store.services.transport.load() {
            Some(envelope) => store.dispatch(Action::Sync(SyncAction::Hydrate(envelope))),
            None => log::info!("No stored admin state, starting from defaults"),
        }
        store
    }

    /// Add middleware to the store
    pub fn add_middleware(&mut self, middleware: Box<dyn Middleware>) {
        self.middleware.push(middleware);
    }

    /// Get the current state
    pub fn state(&self) -> &AdminState {
        &self.state
    }

    /// Get the dispatcher
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Subscribe to `admin_state_change` events
    pub fn change_feed(&self) -> &ChangeFeed {
        &self.changes
    }

    pub fn transport(&self) -> &Arc<dyn SyncTransport> {
        &self.services.transport
    }

    /// Process an action, then everything it queued
    pub fn dispatch(&mut self, action: Action) {
        self.process(action);
        self.process_pending();
    }

    /// Drain queued actions (sync listeners, middleware follow-ups) and
    /// persist the result
    pub fn process_pending(&mut self) {
        loop {
            while let Ok(action) = self.action_rx.try_recv() {
                self.process(action);
            }
            if !self.flush() {
                break;
            }
        }
    }

    fn process(&mut self, action: Action) {
        // Pass through middleware chain
        for middleware in &mut self.middleware {
            if !middleware.handle(&action, &self.state, &self.dispatcher) {
                return;
            }
        }

        let previous = self.state.clone();
        self.state = reduce(previous.clone(), &action);

        for middleware in &mut self.middleware {
            middleware.after_reduce(&action, &previous, &self.state, &self.dispatcher);
        }
    }

    /// Broadcast dirty fields, returns whether anything was written
    fn flush(&mut self) -> bool {
        if self.state.dirty.is_empty() {
            return false;
        }
        match self.services.transport.broadcast(&self.state) {
            Some(envelope) => {
                self.process(Action::Sync(SyncAction::Committed(envelope)));
                true
            }
            None => {
                log::warn!("Admin state not persisted, keeping changes marked dirty");
                false
            }
        }
    }

    /// Snapshot of the current state as a storage envelope
    pub fn envelope(&self) -> SyncEnvelope {
        let mut state = self.state.clone();
        state.dirty = Default::default();
        state.applied_sequence = 0;
        SyncEnvelope {
            sequence: self.state.applied_sequence,
            origin: self.services.transport.origin(),
            written_at: self.services.clock.now(),
            state,
        }
    }

    //
    // AUTHENTICATION
    //

    /// Log in with the configured credentials
    pub fn login(&mut self, username: &str, password: &str) -> bool {
        if !self.services.credentials.matches(username, password) {
            log::warn!("Login failed for {:?}", username);
            return false;
        }
        self.dispatch(Action::Auth(AuthAction::LoginSucceeded {
            username: username.to_string(),
        }));
        true
    }

    pub fn logout(&mut self) {
        self.dispatch(Action::Auth(AuthAction::Logout));
    }

    //
    // CATALOG
    //

    pub fn update_prices(&mut self, prices: PriceConfig) {
        self.dispatch(Action::Prices(PricesAction::Update(prices)));
    }

    /// Add a zone, returns its id if the store accepted it
    pub fn add_delivery_zone(&mut self, zone: NewDeliveryZone) -> Option<u64> {
        let id = self.services.ids.next_id();
        let zone = DeliveryZone::create(id, zone, self.services.clock.now());
        self.dispatch(Action::DeliveryZone(DeliveryZoneAction::Add(zone)));
        self.state.find_delivery_zone(id).map(|zone| zone.id)
    }

    pub fn update_delivery_zone(&mut self, mut zone: DeliveryZone) {
        zone.updated_at = self.services.clock.now();
        self.dispatch(Action::DeliveryZone(DeliveryZoneAction::Update(zone)));
    }

    pub fn delete_delivery_zone(&mut self, id: u64) {
        self.dispatch(Action::DeliveryZone(DeliveryZoneAction::Delete(id)));
    }

    /// Add a novel, returns its id if the store accepted it
    pub fn add_novel(&mut self, novel: NewNovel) -> Option<u64> {
        let id = self.services.ids.next_id();
        let novel = Novel::create(id, novel, self.services.clock.now());
        self.dispatch(Action::Novel(NovelAction::Add(novel)));
        self.state.find_novel(id).map(|novel| novel.id)
    }

    pub fn update_novel(&mut self, mut novel: Novel) {
        novel.updated_at = self.services.clock.now();
        self.dispatch(Action::Novel(NovelAction::Update(novel)));
    }

    pub fn delete_novel(&mut self, id: u64) {
        self.dispatch(Action::Novel(NovelAction::Delete(id)));
    }

    //
    // NOTIFICATIONS
    //

    pub fn add_notification(&mut self, draft: NotificationDraft) {
        let notification = draft.stamp(
            self.services.ids.next_id().to_string(),
            self.services.clock.now(),
        );
        self.dispatch(Action::Notification(NotificationAction::Add(notification)));
    }

    /// Empty the log; it ends up holding only the "cleared" entry
    pub fn clear_notifications(&mut self) {
        self.dispatch(Action::Notification(NotificationAction::Clear));
    }

    //
    // REMOTE SYNC AND EXPORT
    //

    /// Simulated round trip to the remote, returns whether it succeeded
    pub async fn sync_with_remote(&mut self) -> bool {
        self.dispatch(Action::Sync(SyncAction::RemoteStarted));

        let remote = Arc::clone(&self.services.remote);
        match remote.push(&self.state).await {
            Ok(()) => {
                let at = self.services.clock.now();
                self.dispatch(Action::Sync(SyncAction::RemoteCompleted { at }));
                true
            }
            Err(e) => {
                log::error!("Remote sync failed: {}", e);
                self.dispatch(Action::Sync(SyncAction::RemoteFailed {
                    reason: e.to_string(),
                }));
                false
            }
        }
    }

    /// Write the system export archive into `dir`
    ///
    /// Failures end up as an error notification, never as an `Err`.
    pub async fn export_system_backup(&mut self, dir: &Path) -> Option<std::path::PathBuf> {
        self.dispatch(Action::Backup(BackupAction::Started));

        let at = self.services.clock.now();
        match export::export_system_backup(dir.to_path_buf(), self.envelope(), at).await {
            Ok(path) => {
                self.dispatch(Action::Backup(BackupAction::Exported {
                    at,
                    path: path.clone(),
                }));
                Some(path)
            }
            Err(e) => {
                let reason = e.to_string();
                log::error!("System export failed: {:#}", anyhow::Error::from(e));
                self.dispatch(Action::Backup(BackupAction::Failed { reason }));
                None
            }
        }
    }

    /// Replace the catalog with the one stored in an export archive
    ///
    /// Prices, delivery zones and novels are taken from the archive and
    /// broadcast to the other tabs. Returns false when not logged in or when
    /// the archive cannot be read.
    pub async fn restore_system_backup(&mut self, archive: &Path) -> bool {
        match export::load_system_backup(archive.to_path_buf()).await {
            Ok(envelope) => {
                let accepted = self.state.is_authenticated;
                self.dispatch(Action::Backup(BackupAction::Restored {
                    path: archive.to_path_buf(),
                    state: Box::new(envelope.state),
                }));
                accepted
            }
            Err(e) => {
                let reason = e.to_string();
                log::error!("System restore failed: {:#}", anyhow::Error::from(e));
                self.dispatch(Action::Backup(BackupAction::RestoreFailed { reason }));
                false
            }
        }
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        self.services.transport.unsubscribe(self.subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ChangeType;
    use crate::remote::SimulatedRemote;
    use crate::stamp::{ManualClock, SequentialIds};
    use crate::state::{NotificationKind, MAX_NOTIFICATIONS};
    use crate::sync::StorageSyncService;
    use alacarta_storage::{FileStorage, LocalStorage, MemoryStorage, ADMIN_STATE_KEY};
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn store_with<S: LocalStorage + 'static>(
        storage: S,
        first_id: u64,
        remote: SimulatedRemote,
    ) -> Store {
        Store::new(StoreServices {
            transport: StorageSyncService::new(storage),
            remote: Arc::new(remote),
            clock: Arc::new(ManualClock::new(start())),
            ids: Arc::new(SequentialIds::starting_at(first_id)),
            credentials: Credentials::default(),
        })
    }

    fn store_on<S: LocalStorage + 'static>(storage: S, first_id: u64) -> Store {
        store_with(storage, first_id, SimulatedRemote::new(Duration::from_millis(10)))
    }

    fn logged_in(storage: MemoryStorage) -> Store {
        let mut store = store_on(storage, 1);
        assert!(store.login("admin", "admin123"));
        store
    }

    /// One poll tick on every tab until nothing changes
    fn settle(tabs: &mut [&mut Store]) {
        for _ in 0..3 {
            for tab in tabs.iter_mut() {
                tab.transport().check_for_updates();
                tab.process_pending();
            }
        }
    }

    fn prices(movie_price: u32) -> PriceConfig {
        PriceConfig {
            movie_price,
            ..PriceConfig::default()
        }
    }

    #[test]
    fn test_login_only_with_configured_pair() {
        let mut store = store_on(MemoryStorage::new(), 1);

        assert!(!store.login("admin", "wrong"));
        assert!(!store.login("root", "admin123"));
        assert!(!store.state().is_authenticated);
        assert!(store.state().notifications.is_empty());

        assert!(store.login("admin", "admin123"));
        assert!(store.state().is_authenticated);
        assert_eq!(
            store.state().notifications.latest().unwrap().kind,
            NotificationKind::Success
        );

        store.logout();
        assert!(!store.state().is_authenticated);
        assert_eq!(store.state().notifications.len(), 2);
    }

    #[test]
    fn test_custom_credentials() {
        let mut store = Store::new(StoreServices {
            transport: StorageSyncService::new(MemoryStorage::new()),
            remote: Arc::new(SimulatedRemote::default()),
            clock: Arc::new(ManualClock::new(start())),
            ids: Arc::new(SequentialIds::new()),
            credentials: Credentials::new("operador", "s3creto"),
        });

        assert!(!store.login("admin", "admin123"));
        assert!(store.login("operador", "s3creto"));
    }

    #[test]
    fn test_anonymous_edits_are_rejected() {
        let mut store = store_on(MemoryStorage::new(), 1);

        store.update_prices(prices(1));
        assert_eq!(store.add_delivery_zone(NewDeliveryZone::new("Centro", 100)), None);

        assert_eq!(store.state().prices, PriceConfig::default());
        assert!(store.state().delivery_zones.is_empty());
        assert_eq!(store.state().sync_status.pending_changes, 0);
    }

    #[test]
    fn test_add_vista_alegre() {
        let storage = MemoryStorage::new();
        let mut store = logged_in(storage.clone());
        let mut events = store.change_feed().subscribe();

        let id = store
            .add_delivery_zone(NewDeliveryZone::new("Vista Alegre", 300))
            .unwrap();

        let state = store.state();
        assert_eq!(state.delivery_zones.len(), 1);
        let zone = state.find_delivery_zone(id).unwrap();
        assert_eq!(zone.name, "Vista Alegre");
        assert_eq!(zone.cost, 300);
        assert_eq!(zone.created_at, zone.updated_at);
        assert_eq!(state.sync_status.pending_changes, 1);
        assert!(state.dirty.is_empty());

        let event = events.try_recv().unwrap();
        assert_eq!(event.change, ChangeType::DeliveryZoneAdd);
        assert_eq!(event.data["name"], "Vista Alegre");

        let stored = SyncEnvelope::from_json(&storage.get_item(ADMIN_STATE_KEY).unwrap().unwrap())
            .unwrap();
        assert_eq!(stored.state.delivery_zones, state.delivery_zones);
        assert_eq!(stored.sequence, state.applied_sequence);
        // Edit and its notification went out as one envelope
        assert_eq!(stored.state.notifications, state.notifications);
    }

    #[test]
    fn test_update_prices_replaces_exactly() {
        let mut store = logged_in(MemoryStorage::new());
        let new_prices = PriceConfig {
            movie_price: 90,
            series_price: 320,
            transfer_fee_percentage: 15,
            novel_price_per_chapter: 6,
        };

        store.update_prices(new_prices);
        assert_eq!(store.state().prices, new_prices);
        assert_eq!(store.state().sync_status.pending_changes, 1);
    }

    #[test]
    fn test_update_zone_refreshes_updated_at() {
        let clock = Arc::new(ManualClock::new(start()));
        let mut store = Store::new(StoreServices {
            transport: StorageSyncService::new(MemoryStorage::new()),
            remote: Arc::new(SimulatedRemote::default()),
            clock: clock.clone(),
            ids: Arc::new(SequentialIds::new()),
            credentials: Credentials::default(),
        });
        store.login("admin", "admin123");
        let id = store
            .add_delivery_zone(NewDeliveryZone::new("Centro", 100))
            .unwrap();

        clock.advance(chrono::Duration::minutes(3));
        let mut zone = store.state().find_delivery_zone(id).unwrap().clone();
        zone.active = false;
        store.update_delivery_zone(zone);

        let zone = store.state().find_delivery_zone(id).unwrap();
        assert!(!zone.active);
        assert_eq!(zone.created_at, start());
        assert_eq!(zone.updated_at, start() + chrono::Duration::minutes(3));
        assert_eq!(store.state().active_delivery_zones().count(), 0);
    }

    #[test]
    fn test_missing_id_delete_is_silent_noop() {
        let storage = MemoryStorage::new();
        let mut store = logged_in(storage.clone());
        store.add_novel(NewNovel::new("Rubí", "Drama", 115, 2004)).unwrap();
        let mut events = store.change_feed().subscribe();
        let before = store.state().clone();
        let stored_before = storage.get_item(ADMIN_STATE_KEY).unwrap();

        store.delete_novel(999);
        store.delete_delivery_zone(999);

        assert_eq!(store.state(), &before);
        assert!(events.try_recv().is_err());
        assert_eq!(storage.get_item(ADMIN_STATE_KEY).unwrap(), stored_before);
    }

    #[test]
    fn test_novel_crud() {
        let mut store = logged_in(MemoryStorage::new());
        let id = store
            .add_novel(NewNovel::new("Café con aroma de mujer", "Drama", 80, 1994))
            .unwrap();

        let mut novel = store.state().find_novel(id).unwrap().clone();
        novel.chapters = 90;
        store.update_novel(novel);
        assert_eq!(store.state().find_novel(id).unwrap().chapters, 90);

        store.delete_novel(id);
        assert!(store.state().novels.is_empty());
        assert_eq!(store.state().sync_status.pending_changes, 3);
        assert_eq!(
            store.state().notifications.latest().unwrap().kind,
            NotificationKind::Warning
        );
    }

    #[test]
    fn test_clear_notifications_leaves_one_entry() {
        let mut store = logged_in(MemoryStorage::new());
        for n in 0..5 {
            store.add_notification(NotificationDraft::new(
                NotificationKind::Info,
                format!("#{}", n),
                "",
                "Sistema",
                "test",
            ));
        }
        assert_eq!(store.state().notifications.len(), 6);

        store.clear_notifications();

        let log = &store.state().notifications;
        assert_eq!(log.len(), 1);
        assert_eq!(log.latest().unwrap().action, "clear");
        assert_eq!(store.state().sync_status.pending_changes, 0);
    }

    #[test]
    fn test_notification_log_capped_through_store() {
        let mut store = logged_in(MemoryStorage::new());
        for n in 0..(MAX_NOTIFICATIONS + 20) {
            store.add_notification(NotificationDraft::new(
                NotificationKind::Info,
                n.to_string(),
                "",
                "Sistema",
                "test",
            ));
        }
        let log = &store.state().notifications;
        assert_eq!(log.len(), MAX_NOTIFICATIONS);
        assert_eq!(log.latest().unwrap().title, (MAX_NOTIFICATIONS + 19).to_string());
    }

    #[test]
    fn test_new_tab_hydrates_from_storage() {
        let storage = MemoryStorage::new();
        let mut first = logged_in(storage.clone());
        first.update_prices(prices(120));

        let second = store_on(storage.open_tab(), 100);
        assert_eq!(second.state().prices.movie_price, 120);
        assert!(second.state().is_authenticated);
        assert_eq!(second.state().applied_sequence, first.state().applied_sequence);
    }

    #[test]
    fn test_divergent_prices_converge_to_last_broadcast_after_poll() {
        // File storage raises no events, tabs only learn by polling
        let dir = tempfile::tempdir().unwrap();
        let mut tab_a = store_on(FileStorage::open(dir.path()).unwrap(), 1);
        let mut tab_b = store_on(FileStorage::open(dir.path()).unwrap(), 1000);
        tab_a.login("admin", "admin123");
        settle(&mut [&mut tab_a, &mut tab_b]);
        assert!(tab_b.state().is_authenticated);

        tab_a.update_prices(prices(95));
        tab_b.update_prices(prices(70));
        assert_eq!(tab_a.state().prices.movie_price, 95);

        settle(&mut [&mut tab_a, &mut tab_b]);

        assert_eq!(tab_a.state().prices.movie_price, 70);
        assert_eq!(tab_b.state().prices.movie_price, 70);
        assert_eq!(tab_a.state().versions, tab_b.state().versions);
    }

    #[test]
    fn test_edits_of_different_fields_both_survive() {
        let storage = MemoryStorage::new();
        let mut tab_a = logged_in(storage.clone());
        let mut tab_b = store_on(storage.open_tab(), 1000);
        settle(&mut [&mut tab_a, &mut tab_b]);

        tab_a.update_prices(prices(95));
        // Tab B edits before draining the storage event from tab A
        tab_b.add_delivery_zone(NewDeliveryZone::new("Vista Alegre", 300)).unwrap();

        settle(&mut [&mut tab_a, &mut tab_b]);

        for tab in [&tab_a, &tab_b] {
            assert_eq!(tab.state().prices.movie_price, 95);
            assert_eq!(tab.state().delivery_zones.len(), 1);
            assert_eq!(tab.state().delivery_zones[0].name, "Vista Alegre");
        }
        assert_eq!(tab_a.state().notifications, tab_b.state().notifications);
    }

    #[test]
    fn test_foreign_merge_counts_as_full_sync() {
        let storage = MemoryStorage::new();
        let mut tab_a = logged_in(storage.clone());
        let mut tab_b = store_on(storage.open_tab(), 1000);
        settle(&mut [&mut tab_a, &mut tab_b]);

        tab_a.update_prices(prices(95));
        tab_a.add_delivery_zone(NewDeliveryZone::new("Centro", 100));
        assert_eq!(tab_a.state().sync_status.pending_changes, 2);

        tab_b.process_pending();
        let status = &tab_b.state().sync_status;
        assert_eq!(status.pending_changes, 0);
        assert_eq!(status.last_sync, Some(start()));

        // Own envelopes never reset the counter
        tab_a.transport().check_for_updates();
        tab_a.process_pending();
        assert_eq!(tab_a.state().sync_status.pending_changes, 2);
    }

    #[test]
    fn test_tabs_converge_after_stored_state_is_lost() {
        let storage = MemoryStorage::new();
        let mut tab_a = logged_in(storage.clone());
        for price in 91..=95 {
            tab_a.update_prices(prices(price));
        }
        let before = tab_a.state().applied_sequence;

        storage.set_item(ADMIN_STATE_KEY, "{garbage").unwrap();

        // A tab opened after the loss starts from defaults
        let mut tab_b = store_on(storage.open_tab(), 1000);
        assert!(tab_b.login("admin", "admin123"));
        tab_b.add_delivery_zone(NewDeliveryZone::new("Centro", 100)).unwrap();

        settle(&mut [&mut tab_a, &mut tab_b]);

        assert!(tab_a.state().applied_sequence > before);
        for tab in [&tab_a, &tab_b] {
            assert_eq!(tab.state().delivery_zones.len(), 1);
            assert_eq!(tab.state().prices.movie_price, 95);
            assert!(tab.state().dirty.is_empty());
        }
        assert_eq!(tab_a.state().versions, tab_b.state().versions);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_with_remote_success() {
        let mut store = logged_in(MemoryStorage::new());
        store.update_prices(prices(90));
        assert_eq!(store.state().sync_status.pending_changes, 1);

        assert!(store.sync_with_remote().await);

        let status = &store.state().sync_status;
        assert!(status.is_online);
        assert_eq!(status.pending_changes, 0);
        assert_eq!(status.last_sync, Some(start()));
        assert_eq!(store.state().notifications.latest().unwrap().action, "sync");
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_with_remote_failure() {
        let mut store = store_with(
            MemoryStorage::new(),
            1,
            SimulatedRemote::failing(Duration::from_secs(1)),
        );
        store.login("admin", "admin123");
        store.update_prices(prices(90));

        assert!(!store.sync_with_remote().await);

        let state = store.state();
        assert!(!state.sync_status.is_online);
        assert_eq!(state.sync_status.pending_changes, 1);
        let latest = state.notifications.latest().unwrap();
        assert_eq!(latest.kind, NotificationKind::Error);
        assert_eq!(latest.action, "sync_error");
    }

    #[tokio::test]
    async fn test_export_system_backup() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = logged_in(MemoryStorage::new());
        store.add_delivery_zone(NewDeliveryZone::new("Vista Alegre", 300));

        let path = store.export_system_backup(dir.path()).await.unwrap();

        assert!(path.exists());
        assert_eq!(store.state().last_backup, Some(start()));
        let latest = store.state().notifications.latest().unwrap();
        assert_eq!(latest.action, "export");
        assert_eq!(store.state().notifications.iter().nth(1).unwrap().action, "export_start");
    }

    #[tokio::test]
    async fn test_export_failure_becomes_notification() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();
        let mut store = logged_in(MemoryStorage::new());

        assert!(store.export_system_backup(&blocker).await.is_none());
        assert_eq!(store.state().last_backup, None);
        let latest = store.state().notifications.latest().unwrap();
        assert_eq!(latest.kind, NotificationKind::Error);
        assert_eq!(latest.action, "export_error");
    }

    #[tokio::test]
    async fn test_restore_from_export_reaches_other_tabs() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = logged_in(MemoryStorage::new());
        source.update_prices(prices(120));
        source.add_delivery_zone(NewDeliveryZone::new("Playa", 250));
        let archive = source.export_system_backup(dir.path()).await.unwrap();

        let storage = MemoryStorage::new();
        let mut tab_a = logged_in(storage.clone());
        let mut tab_b = store_on(storage.open_tab(), 1000);
        tab_a.add_delivery_zone(NewDeliveryZone::new("Centro", 100));
        let pending = tab_a.state().sync_status.pending_changes;

        assert!(tab_a.restore_system_backup(&archive).await);
        settle(&mut [&mut tab_a, &mut tab_b]);

        for tab in [&tab_a, &tab_b] {
            assert_eq!(tab.state().prices.movie_price, 120);
            assert_eq!(tab.state().delivery_zones.len(), 1);
            assert_eq!(tab.state().delivery_zones[0].name, "Playa");
        }
        assert!(tab_a.state().is_authenticated);
        assert_eq!(tab_a.state().sync_status.pending_changes, pending + 1);
        assert_eq!(tab_a.state().notifications.latest().unwrap().action, "import");
    }

    #[tokio::test]
    async fn test_restore_rejected_or_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = logged_in(MemoryStorage::new());
        source.update_prices(prices(120));
        let archive = source.export_system_backup(dir.path()).await.unwrap();

        let mut anonymous = store_on(MemoryStorage::new(), 1);
        assert!(!anonymous.restore_system_backup(&archive).await);
        assert_eq!(anonymous.state().prices, PriceConfig::default());

        let garbage = dir.path().join("garbage.zip");
        std::fs::write(&garbage, "not a zip").unwrap();
        let mut store = logged_in(MemoryStorage::new());
        assert!(!store.restore_system_backup(&garbage).await);
        assert_eq!(store.state().prices, PriceConfig::default());
        let latest = store.state().notifications.latest().unwrap();
        assert_eq!(latest.kind, NotificationKind::Error);
        assert_eq!(latest.action, "import_error");
    }

    #[test]
    fn test_full_storage_keeps_working_in_memory() {
        let mut store = store_on(MemoryStorage::with_quota(64), 1);
        assert!(store.login("admin", "admin123"));

        store.update_prices(prices(99));
        assert_eq!(store.state().prices.movie_price, 99);
        assert!(!store.state().dirty.is_empty());
    }
}
