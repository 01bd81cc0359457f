//! User feedback seams: toast-style notifications and yes/no confirmation.
//!
//! Views never render anything themselves. They report outcomes through a
//! [`Notifier`] and ask before destructive actions through a [`Confirm`].

use std::fmt;
use std::sync::Mutex;

use educonnect_core::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationLevel::Success => f.write_str("success"),
            NotificationLevel::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

impl From<&ClientError> for Notification {
    fn from(err: &ClientError) -> Self {
        Notification::error(err.to_string())
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log. Used by the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => tracing::info!(notification = %notification.message),
            NotificationLevel::Error => tracing::error!(notification = %notification.message),
        }
    }
}

/// Keeps every notification in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn errors(&self) -> Vec<Notification> {
        self.notifications()
            .into_iter()
            .filter(|n| n.level == NotificationLevel::Error)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(notification);
    }
}

/// Explicit yes/no answer from the user.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Fixed answer, for `--yes` and for tests.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}
