// ── Notifications ──
//
// Short status messages shown in the footer. The queue is bounded and
// drops the oldest entry first.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use strum::{Display, IntoStaticStr};

/// Maximum number of notifications retained.
pub const NOTIFICATION_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub timestamp: DateTime<Local>,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            timestamp: Local::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    entries: VecDeque<Notification>,
}

impl NotificationQueue {
    pub fn push(&mut self, notification: Notification) {
        self.entries.push_back(notification);
        while self.entries.len() > NOTIFICATION_LIMIT {
            self.entries.pop_front();
        }
    }

    /// Drop everything, then confirm with a single success entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.push(Notification::success("Notifications cleared"));
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.entries.back()
    }

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
