use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

/// A user-facing message, rendered as a toast or a log line by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

impl Notification {
    /// Emitted once per batch that hit at least one transport error.
    pub fn load_failed() -> Self {
        Self {
            title: "Error".to_string(),
            description: "Failed to load reports data".to_string(),
        }
    }
}

/// Receives notifications from the dashboard. Must not block.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<F> Notifier for F
where
    F: Fn(Notification) + Send + Sync,
{
    fn notify(&self, notification: Notification) {
        self(notification)
    }
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        tracing::warn!(
            title = %notification.title,
            "{}",
            notification.description
        );
    }
}

/// Forwards notifications to a channel; a closed receiver drops them.
impl Notifier for UnboundedSender<Notification> {
    fn notify(&self, notification: Notification) {
        if self.send(notification).is_err() {
            tracing::debug!("notification receiver dropped");
        }
    }
}
