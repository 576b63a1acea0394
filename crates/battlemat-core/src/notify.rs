//! User-visible notification sink.

use std::collections::VecDeque;

/// How prominently a notification should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Receives recoverable failures that the user should hear about.
pub trait Notifier {
    fn notify(&mut self, title: &str, message: &str, severity: Severity);
}

/// Routes notifications to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, title: &str, message: &str, severity: Severity) {
        match severity {
            Severity::Info => log::info!("{title}: {message}"),
            Severity::Warning => log::warn!("{title}: {message}"),
            Severity::Error => log::error!("{title}: {message}"),
        }
    }
}

/// A queued notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

/// Buffers notifications for a UI to drain as toasts.
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    pending: VecDeque<Notification>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every pending notification, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.pending.drain(..).collect()
    }
}

impl Notifier for NotificationQueue {
    fn notify(&mut self, title: &str, message: &str, severity: Severity) {
        log::debug!("Queued notification: {title}");
        self.pending.push_back(Notification {
            title: title.to_string(),
            message: message.to_string(),
            severity,
        });
    }
}
