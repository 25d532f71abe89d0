//! Admin State Module
//!
//! Contains all state types of the admin store, organized by feature.

mod admin;
mod delivery_zone;
mod notification;
mod novel;
mod prices;
mod sync_status;

pub use admin::AdminState;
pub use delivery_zone::{DeliveryZone, NewDeliveryZone};
pub use notification::{
    Notification, NotificationDraft, NotificationKind, NotificationLog, MAX_NOTIFICATIONS,
};
pub use novel::{NewNovel, Novel};
pub use prices::PriceConfig;
pub use sync_status::{DirtyFields, FieldVersions, SyncField, SyncStatus};
