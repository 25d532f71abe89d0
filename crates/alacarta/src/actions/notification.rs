use crate::state::Notification;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationAction {
    /// Prepend a stamped notification
    Add(Notification),
    /// Empty the log
    Clear,
}
