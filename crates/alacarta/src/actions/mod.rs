//! Actions module
//!
//! Every change to the admin state is described by an [`Action`]. Actions are
//! tagged by domain; each domain has its own sub-enum and sub-reducer.
//! Ids and timestamps are stamped into the action before dispatch, so the
//! reducers stay pure.

pub mod auth;
pub mod backup;
pub mod delivery_zone;
pub mod notification;
pub mod novel;
pub mod prices;
pub mod sync;

pub use auth::AuthAction;
pub use backup::BackupAction;
pub use delivery_zone::DeliveryZoneAction;
pub use notification::NotificationAction;
pub use novel::NovelAction;
pub use prices::PricesAction;
pub use sync::SyncAction;

/// Root action enum - tagged by domain
#[derive(Debug, Clone)]
pub enum Action {
    Auth(AuthAction),
    Prices(PricesAction),
    DeliveryZone(DeliveryZoneAction),
    Novel(NovelAction),
    Notification(NotificationAction),
    Sync(SyncAction),
    Backup(BackupAction),

    /// No-op action
    None,
}

impl Action {
    /// Edits to the admin catalog, only allowed while logged in
    pub fn is_admin_mutation(&self) -> bool {
        matches!(
            self,
            Action::Prices(_)
                | Action::DeliveryZone(_)
                | Action::Novel(_)
                | Action::Backup(BackupAction::Restored { .. })
        )
    }
}
