//! Desktop alert and sound boundary

use shared::models::Notification;

/// Whether the user allowed desktop alerts
///
/// Asking for permission happens outside the engine; the result is handed
/// in through [`super::NotificationCenter::set_permission`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertPermission {
    /// Not asked yet
    #[default]
    Default,
    Granted,
    Denied,
}

/// Surface for desktop alerts and the audible cue
pub trait AlertSink: Send + Sync {
    fn show_alert(&self, notification: &Notification);
    fn play_sound(&self);
}

/// Writes alerts to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn show_alert(&self, notification: &Notification) {
        tracing::info!(
            kind = %notification.kind,
            order_id = notification.order_id.as_deref().unwrap_or("-"),
            "{}: {}",
            notification.title,
            notification.message
        );
    }

    fn play_sound(&self) {
        tracing::debug!("Notification sound");
    }
}
