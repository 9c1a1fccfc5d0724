//! Notification engine
//!
//! Produces, deduplicates and persists the user-facing notifications for
//! order lifecycle events, and forwards new ones to the [`AlertSink`].
//!
//! A notification is dropped when one with the same order id and type was
//! recorded less than [`DEDUP_WINDOW_MS`] earlier. The list keeps the
//! [`MAX_NOTIFICATIONS`] most recent entries, newest first.

mod alert;
mod clock;

pub use alert::{AlertPermission, AlertSink, LogAlertSink};
pub use clock::{Clock, ManualClock, SystemClock};

use parking_lot::Mutex;
use shared::models::{Notification, NotificationType};
use shared::order::OrderStatus;
use shared::util::short_id;
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

use crate::storage::{PersistedCache, keys};

/// Window in which a repeated (order id, type) pair is suppressed
pub const DEDUP_WINDOW_MS: i64 = 5_000;
/// Notifications kept
pub const MAX_NOTIFICATIONS: usize = 50;

struct State {
    notifications: Vec<Notification>,
    sound_enabled: bool,
    permission: AlertPermission,
    panel_open: bool,
}

/// Notification center
pub struct NotificationCenter {
    state: Mutex<State>,
    cache: PersistedCache,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn AlertSink>,
    list_tx: watch::Sender<Vec<Notification>>,
    unread_tx: watch::Sender<usize>,
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("unread", &*self.unread_tx.borrow())
            .finish_non_exhaustive()
    }
}

impl NotificationCenter {
    /// Restore the persisted list and sound preference
    pub fn new(cache: PersistedCache, clock: Arc<dyn Clock>, sink: Arc<dyn AlertSink>) -> Self {
        let mut notifications: Vec<Notification> = cache.load_or_default(keys::NOTIFICATIONS);
        notifications.truncate(MAX_NOTIFICATIONS);
        let sound_enabled = cache.load::<bool>(keys::SOUND_ENABLED).unwrap_or(true);

        let unread = count_unread(&notifications);
        let (list_tx, _) = watch::channel(notifications.clone());
        let (unread_tx, _) = watch::channel(unread);

        Self {
            state: Mutex::new(State {
                notifications,
                sound_enabled,
                permission: AlertPermission::Default,
                panel_open: false,
            }),
            cache,
            clock,
            sink,
            list_tx,
            unread_tx,
        }
    }

    /// Record a notification
    ///
    /// Returns `None` when it was suppressed as a duplicate.
    pub fn notify(
        &self,
        kind: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
        order_id: Option<&str>,
    ) -> Option<Notification> {
        let now = self.clock.now_millis();
        let notification = Notification {
            id: format!("notification-{}-{}", now, &Uuid::new_v4().simple().to_string()[..8]),
            kind,
            title: title.into(),
            message: message.into(),
            timestamp: now,
            read: false,
            order_id: order_id.map(str::to_string),
        };

        let (alert, sound) = {
            let mut state = self.state.lock();

            let duplicate = state.notifications.iter().any(|existing| {
                existing.order_id == notification.order_id
                    && existing.kind == notification.kind
                    && (existing.timestamp - now).abs() < DEDUP_WINDOW_MS
            });
            if duplicate {
                tracing::debug!(
                    kind = %kind,
                    order_id = order_id.unwrap_or("-"),
                    "Duplicate notification suppressed"
                );
                return None;
            }

            state.notifications.insert(0, notification.clone());
            state.notifications.truncate(MAX_NOTIFICATIONS);
            self.publish(&state.notifications);

            (
                state.permission == AlertPermission::Granted,
                state.sound_enabled,
            )
        };

        if alert {
            self.sink.show_alert(&notification);
        }
        if sound {
            self.sink.play_sound();
        }

        Some(notification)
    }

    /// `new-order` notification for an order placed by `customer`
    pub fn notify_new_order(&self, order_id: &str, customer: &str) -> Option<Notification> {
        self.notify(
            NotificationType::NewOrder,
            "New order",
            format!("Order #{} from {}", short_id(order_id), customer),
            Some(order_id),
        )
    }

    /// `order-update` notification for a status change
    pub fn notify_status_update(&self, order_id: &str, status: OrderStatus) -> Option<Notification> {
        self.notify(
            NotificationType::OrderUpdate,
            "Order updated",
            format!("Order #{} is now {}", short_id(order_id), status.label()),
            Some(order_id),
        )
    }

    pub fn mark_as_read(&self, notification_id: &str) {
        let mut state = self.state.lock();
        let Some(notification) = state
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id)
        else {
            return;
        };
        notification.read = true;
        self.publish(&state.notifications);
    }

    pub fn mark_all_as_read(&self) {
        let mut state = self.state.lock();
        for notification in state.notifications.iter_mut() {
            notification.read = true;
        }
        self.publish(&state.notifications);
    }

    /// Drop every notification and close the panel
    pub fn clear_all(&self) {
        let mut state = self.state.lock();
        state.notifications.clear();
        state.panel_open = false;
        self.publish(&state.notifications);
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.state.lock().notifications.clone()
    }

    pub fn unread_count(&self) -> usize {
        *self.unread_tx.borrow()
    }

    /// Watch the notification list
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.list_tx.subscribe()
    }

    /// Watch the unread count
    pub fn subscribe_unread(&self) -> watch::Receiver<usize> {
        self.unread_tx.subscribe()
    }

    pub fn set_sound_enabled(&self, enabled: bool) {
        self.state.lock().sound_enabled = enabled;
        self.cache.persist(keys::SOUND_ENABLED, &enabled);
    }

    pub fn sound_enabled(&self) -> bool {
        self.state.lock().sound_enabled
    }

    pub fn set_permission(&self, permission: AlertPermission) {
        self.state.lock().permission = permission;
    }

    pub fn permission(&self) -> AlertPermission {
        self.state.lock().permission
    }

    pub fn set_panel_open(&self, open: bool) {
        self.state.lock().panel_open = open;
    }

    pub fn toggle_panel(&self) -> bool {
        let mut state = self.state.lock();
        state.panel_open = !state.panel_open;
        state.panel_open
    }

    pub fn panel_open(&self) -> bool {
        self.state.lock().panel_open
    }

    /// Persist and broadcast; called with the state lock held
    fn publish(&self, notifications: &[Notification]) {
        self.cache.persist(keys::NOTIFICATIONS, notifications);
        self.unread_tx.send_replace(count_unread(notifications));
        self.list_tx.send_replace(notifications.to_vec());
    }
}

fn count_unread(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.read).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct CountingSink {
        alerts: AtomicUsize,
        sounds: AtomicUsize,
    }

    impl AlertSink for CountingSink {
        fn show_alert(&self, _notification: &Notification) {
            self.alerts.fetch_add(1, Ordering::SeqCst);
        }

        fn play_sound(&self) {
            self.sounds.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn center() -> (NotificationCenter, Arc<ManualClock>, Arc<CountingSink>, PersistedCache) {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let sink = Arc::new(CountingSink::default());
        let cache = PersistedCache::in_memory();
        let center = NotificationCenter::new(cache.clone(), clock.clone(), sink.clone());
        (center, clock, sink, cache)
    }

    #[test]
    fn test_dedup_within_window() {
        let (center, clock, _, _) = center();

        assert!(center.notify_status_update("order-1", OrderStatus::Preparing).is_some());
        clock.advance(Duration::from_millis(4_999));
        assert!(center.notify_status_update("order-1", OrderStatus::Ready).is_none());
        assert_eq!(center.notifications().len(), 1);

        clock.advance(Duration::from_millis(1));
        assert!(center.notify_status_update("order-1", OrderStatus::Ready).is_some());
        assert_eq!(center.notifications().len(), 2);
    }

    #[test]
    fn test_dedup_is_per_order_and_type() {
        let (center, _, _, _) = center();

        center.notify_new_order("order-1", "Ana");
        center.notify_status_update("order-1", OrderStatus::Preparing);
        center.notify_new_order("order-2", "Luis");
        assert_eq!(center.notifications().len(), 3);
    }

    #[test]
    fn test_cap_keeps_newest_first() {
        let (center, clock, _, _) = center();

        for i in 0..60 {
            center.notify(
                NotificationType::Info,
                "info",
                format!("message {}", i),
                Some(&format!("order-{}", i)),
            );
            clock.advance(Duration::from_millis(10));
        }

        let list = center.notifications();
        assert_eq!(list.len(), MAX_NOTIFICATIONS);
        assert_eq!(list[0].message, "message 59");
        assert_eq!(list[49].message, "message 10");
        assert_eq!(center.unread_count(), 50);
    }

    #[test]
    fn test_read_state_and_clear() {
        let (center, _, _, _) = center();
        let first = center.notify_new_order("order-1", "Ana").unwrap();
        center.notify_new_order("order-2", "Luis");
        assert_eq!(center.unread_count(), 2);

        center.mark_as_read(&first.id);
        assert_eq!(center.unread_count(), 1);

        center.mark_all_as_read();
        assert_eq!(center.unread_count(), 0);

        center.set_panel_open(true);
        center.clear_all();
        assert!(center.notifications().is_empty());
        assert!(!center.panel_open());
    }

    #[test]
    fn test_alerts_follow_permission_and_sound() {
        let (center, clock, sink, _) = center();

        center.notify_new_order("order-1", "Ana");
        assert_eq!(sink.alerts.load(Ordering::SeqCst), 0);
        assert_eq!(sink.sounds.load(Ordering::SeqCst), 1);

        center.set_permission(AlertPermission::Granted);
        center.set_sound_enabled(false);
        clock.advance(Duration::from_secs(1));
        center.notify_new_order("order-2", "Luis");
        assert_eq!(sink.alerts.load(Ordering::SeqCst), 1);
        assert_eq!(sink.sounds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_state_survives_restart() {
        let (center, clock, sink, cache) = center();
        center.notify_new_order("order-1", "Ana");
        center.set_sound_enabled(false);

        let restored = NotificationCenter::new(cache, clock, sink);
        assert_eq!(restored.notifications().len(), 1);
        assert_eq!(restored.unread_count(), 1);
        assert!(!restored.sound_enabled());
    }

    #[test]
    fn test_corrupt_persisted_list_starts_empty() {
        let cache = PersistedCache::in_memory();
        cache.store().set(keys::NOTIFICATIONS, "[{\"broken\"").unwrap();

        let center = NotificationCenter::new(
            cache,
            Arc::new(SystemClock),
            Arc::new(LogAlertSink),
        );
        assert!(center.notifications().is_empty());
        assert!(center.sound_enabled());
    }
}
