// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Display;

use tracing::{info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationLevel {
    Positive,
    Warning,
    Negative,
}

impl Display for NotificationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NotificationLevel::Positive => "positive",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Negative => "negative",
        };

        write!(f, "{}", s)
    }
}

/// Short message shown to the user without blocking the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn positive(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Positive,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    pub fn negative(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Negative,
            message: message.into(),
        }
    }
}

/// Receiver of user facing notifications, usually backed by the toast component of the page.
pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, notification: Notification);
}

/// Notifier which only writes notifications to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Positive => info!(message = %notification.message, "notification"),
            NotificationLevel::Warning | NotificationLevel::Negative => {
                warn!(level = %notification.level, message = %notification.message, "notification")
            }
        }
    }
}
