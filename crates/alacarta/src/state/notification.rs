//! Notification log
//!
//! Append-only feedback for admin operations. Newest entries come first and
//! the log keeps at most [`MAX_NOTIFICATIONS`] entries; older ones are dropped
//! silently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use strum::{AsRefStr, Display, EnumString};

/// Maximum notifications to keep (prevent unbounded growth)
pub const MAX_NOTIFICATIONS: usize = 100;

/// Kind of notification (determines icon)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
    Info,
}

impl NotificationKind {
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Success => "✅",
            Self::Warning => "⚠️",
            Self::Error => "🚨",
            Self::Info => "ℹ️",
        }
    }
}

/// A single notification with metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Admin panel section the notification belongs to
    pub section: String,
    /// Short machine name of what happened (`create`, `sync_error`, ...)
    pub action: String,
}

/// Notification content before it gets an id and timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub section: String,
    pub action: String,
}

impl NotificationDraft {
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        section: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            section: section.into(),
            action: action.into(),
        }
    }

    pub fn stamp(self, id: String, timestamp: DateTime<Utc>) -> Notification {
        Notification {
            id,
            kind: self.kind,
            title: self.title,
            message: self.message,
            timestamp,
            section: self.section,
            action: self.action,
        }
    }
}

/// Newest-first log of notifications
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Notification>", into = "Vec<Notification>")]
pub struct NotificationLog {
    entries: VecDeque<Notification>,
}

impl NotificationLog {
    /// Prepend a notification, dropping the oldest if over the limit
    pub fn push(&mut self, notification: Notification) {
        self.entries.push_front(notification);
        self.entries.truncate(MAX_NOTIFICATIONS);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The most recent notification (if any)
    pub fn latest(&self) -> Option<&Notification> {
        self.entries.front()
    }

    /// Iterate newest first
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<Notification>> for NotificationLog {
    fn from(mut entries: Vec<Notification>) -> Self {
        entries.truncate(MAX_NOTIFICATIONS);
        Self {
            entries: entries.into(),
        }
    }
}

impl From<NotificationLog> for Vec<Notification> {
    fn from(log: NotificationLog) -> Self {
        log.entries.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn notification(n: usize) -> Notification {
        NotificationDraft::new(NotificationKind::Info, format!("#{n}"), "", "Tests", "test")
            .stamp(n.to_string(), Utc::now())
    }

    #[test]
    fn test_push_is_newest_first_and_capped() {
        let mut log = NotificationLog::default();
        for n in 0..150 {
            log.push(notification(n));
        }

        assert_eq!(log.len(), MAX_NOTIFICATIONS);
        assert_eq!(log.latest().unwrap().id, "149");
        let ids: Vec<_> = log.iter().map(|n| n.id.parse::<usize>().unwrap()).collect();
        assert!(ids.windows(2).all(|pair| pair[0] > pair[1]));
        assert_eq!(*ids.last().unwrap(), 50);
    }

    #[test]
    fn test_oversized_stored_log_is_truncated() {
        let stored: Vec<Notification> = (0..120).map(notification).collect();
        let log = NotificationLog::from(stored);
        assert_eq!(log.len(), MAX_NOTIFICATIONS);
        assert_eq!(log.latest().unwrap().id, "0");
    }

    #[test]
    fn test_kind_string_forms() {
        assert_eq!(NotificationKind::Warning.to_string(), "warning");
        assert_eq!(NotificationKind::from_str("error").unwrap(), NotificationKind::Error);
        let json = serde_json::to_value(notification(1)).unwrap();
        assert_eq!(json["type"], "info");
    }
}
