//! Transient user-facing messages (the snackbar of the catalog UI).
//!
//! The [`Notifier`] half is handed to whoever needs to report an outcome; the
//! [`NotificationFeed`] half belongs to the host, which renders each message.

use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// How long a notification stays on screen unless told otherwise.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
    Warning,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationLevel::Success => write!(f, "success"),
            NotificationLevel::Error => write!(f, "error"),
            NotificationLevel::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub duration: Duration,
}

/// Sending half. Cheap to clone; notifying never blocks and never fails.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: mpsc::UnboundedSender<Notification>,
}

/// Receiving half, drained by the host UI.
#[derive(Debug)]
pub struct NotificationFeed {
    receiver: mpsc::UnboundedReceiver<Notification>,
}

impl Notifier {
    pub fn new() -> (Self, NotificationFeed) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, NotificationFeed { receiver })
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(NotificationLevel::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(NotificationLevel::Error, message.into());
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.notify(NotificationLevel::Warning, message.into());
    }

    fn notify(&self, level: NotificationLevel, message: String) {
        match level {
            NotificationLevel::Success => info!(%message, "Notification"),
            NotificationLevel::Error => error!(%message, "Notification"),
            NotificationLevel::Warning => warn!(%message, "Notification"),
        }
        let notification = Notification {
            level,
            message,
            duration: DEFAULT_DURATION,
        };
        if self.sender.send(notification).is_err() {
            warn!("Notification feed closed, message dropped");
        }
    }
}

impl NotificationFeed {
    /// Waits for the next notification; `None` once every notifier is gone.
    pub async fn next(&mut self) -> Option<Notification> {
        self.receiver.recv().await
    }

    /// Takes whatever is already queued without waiting.
    pub fn drain(&mut self) -> Vec<Notification> {
        let mut pending = Vec::new();
        while let Ok(notification) = self.receiver.try_recv() {
            pending.push(notification);
        }
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_in_order() {
        let (notifier, mut feed) = Notifier::new();
        notifier.success("saved");
        notifier.clone().error("failed");
        notifier.warning("careful");

        let levels: Vec<_> = feed.drain().into_iter().map(|n| n.level).collect();
        assert_eq!(
            levels,
            vec![
                NotificationLevel::Success,
                NotificationLevel::Error,
                NotificationLevel::Warning
            ]
        );
    }

    #[tokio::test]
    async fn feed_ends_when_notifiers_drop() {
        let (notifier, mut feed) = Notifier::new();
        notifier.success("only one");
        drop(notifier);

        let first = feed.next().await.unwrap();
        assert_eq!(first.message, "only one");
        assert_eq!(first.duration, DEFAULT_DURATION);
        assert!(feed.next().await.is_none());
    }

    #[test]
    fn closed_feed_is_ignored() {
        let (notifier, feed) = Notifier::new();
        drop(feed);
        notifier.error("nobody listening");
    }
}
