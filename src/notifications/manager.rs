//! Notification manager service
//!
//! An explicitly owned queue of ephemeral messages. Producers push outcomes,
//! display collaborators read the active list or subscribe to the change
//! feed, and [`NotificationManager::run_expiry`] removes each message once its
//! own display window has elapsed.

use super::notification::{Notification, NotificationEvent, NotificationId, Severity};
use log::debug;
use std::cell::{Cell, RefCell};
use std::time::Duration;
use tokio::sync::{broadcast, Notify};
use tokio::time::Instant;

/// Display window used by [`NotificationManager::push`] unless configured otherwise.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

/// Capacity of the change feed; slow subscribers observe `Lagged` instead of blocking producers.
const EVENT_CAPACITY: usize = 64;

/// Insertion-ordered collection of active notifications.
///
/// All mutation happens through `&self` on a single-threaded event loop,
/// so each push, dismissal and expiry is applied as one uninterrupted step.
pub struct NotificationManager {
    active: RefCell<Vec<Notification>>,
    next_id: Cell<u64>,
    default_duration: Duration,
    changed: Notify,
    events: broadcast::Sender<NotificationEvent>,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::with_default_duration(DEFAULT_DURATION)
    }

    /// Create a manager whose `push` uses the given display window.
    pub fn with_default_duration(default_duration: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            active: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            default_duration,
            changed: Notify::new(),
            events,
        }
    }

    /// Push a message that auto-dismisses after the default duration.
    pub fn push(&self, message: impl Into<String>, severity: Severity) -> NotificationId {
        self.push_with_duration(message, severity, Some(self.default_duration))
    }

    /// Push a message with its own display window (`None` = until dismissed).
    ///
    /// Never blocks and never merges with existing notifications.
    pub fn push_with_duration(
        &self,
        message: impl Into<String>,
        severity: Severity,
        duration: Option<Duration>,
    ) -> NotificationId {
        let id = NotificationId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let notification = Notification {
            id,
            message: message.into(),
            severity,
            created_at: Instant::now(),
            duration,
        };
        debug!(
            "Notification {} pushed ({}): {}",
            id,
            severity.label(),
            notification.message
        );

        self.active.borrow_mut().push(notification.clone());
        let _ = self.events.send(NotificationEvent::Pushed(notification));
        self.changed.notify_one();
        id
    }

    /// Remove a notification. Unknown ids are ignored.
    ///
    /// Returns whether a notification was removed.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let removed = {
            let mut active = self.active.borrow_mut();
            let before = active.len();
            active.retain(|n| n.id != id);
            active.len() != before
        };
        if removed {
            debug!("Notification {} dismissed", id);
            let _ = self.events.send(NotificationEvent::Dismissed(id));
            self.changed.notify_one();
        }
        removed
    }

    /// Remove every notification whose window has elapsed.
    pub fn prune_expired(&self) -> Vec<NotificationId> {
        let now = Instant::now();
        let expired: Vec<NotificationId> = {
            let mut active = self.active.borrow_mut();
            let expired = active
                .iter()
                .filter(|n| n.is_expired(now))
                .map(|n| n.id)
                .collect();
            active.retain(|n| !n.is_expired(now));
            expired
        };
        for id in &expired {
            debug!("Notification {} expired", id);
            let _ = self.events.send(NotificationEvent::Expired(*id));
        }
        expired
    }

    /// Active notifications in insertion order, after pruning expired ones.
    pub fn active(&self) -> Vec<Notification> {
        self.prune_expired();
        self.snapshot()
    }

    /// Current contents without pruning.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.active.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.active.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.borrow().is_empty()
    }

    /// Subscribe to pushes, dismissals and expiries.
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.events.subscribe()
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.active
            .borrow()
            .iter()
            .filter_map(Notification::expires_at)
            .min()
    }

    /// Drive auto-dismissal. Runs until the future is dropped.
    pub async fn run_expiry(&self) {
        loop {
            match self.next_deadline() {
                Some(deadline) => {
                    tokio::select! {
                        _ = tokio::time::sleep_until(deadline) => {
                            self.prune_expired();
                        }
                        _ = self.changed.notified() => {}
                    }
                }
                None => self.changed.notified().await,
            }
        }
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NotificationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationManager")
            .field("active", &self.active.borrow().len())
            .field("default_duration", &self.default_duration)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn ids(notifications: &[Notification]) -> Vec<NotificationId> {
        notifications.iter().map(|n| n.id).collect()
    }

    #[test]
    fn test_push_assigns_unique_ids_in_order() {
        let manager = NotificationManager::new();
        let a = manager.push("one", Severity::Info);
        let b = manager.push("two", Severity::Info);
        assert!(a < b);
        assert_eq!(ids(&manager.snapshot()), vec![a, b]);
    }

    #[test]
    fn test_identical_messages_are_not_merged() {
        let manager = NotificationManager::new();
        manager.push("PDF saved", Severity::Success);
        manager.push("PDF saved", Severity::Success);
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_dismiss_is_idempotent() {
        let manager = NotificationManager::new();
        let id = manager.push("bye", Severity::Info);
        assert!(manager.dismiss(id));
        assert!(!manager.dismiss(id));
        assert!(!manager.dismiss(NotificationId(999)));
        assert!(manager.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_three_severities_coexist_and_expire_oldest_first() {
        let manager = NotificationManager::new();
        let a = manager.push("PDF saved", Severity::Success);
        advance(ms(500)).await;
        let b = manager.push("Word export failed", Severity::Error);
        advance(ms(500)).await;
        let c = manager.push("Nothing to copy", Severity::Info);

        assert_eq!(ids(&manager.active()), vec![a, b, c]);

        advance(ms(2000)).await;
        assert_eq!(ids(&manager.active()), vec![b, c]);

        advance(ms(500)).await;
        assert_eq!(ids(&manager.active()), vec![c]);

        advance(ms(500)).await;
        assert!(manager.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_and_sticky_durations() {
        let manager = NotificationManager::with_default_duration(ms(1000));
        let short = manager.push_with_duration("short", Severity::Info, Some(ms(200)));
        let normal = manager.push("normal", Severity::Info);
        let sticky = manager.push_with_duration("sticky", Severity::Error, None);

        advance(ms(250)).await;
        assert_eq!(ids(&manager.active()), vec![normal, sticky]);
        assert!(!ids(&manager.active()).contains(&short));

        advance(ms(10_000)).await;
        assert_eq!(ids(&manager.active()), vec![sticky]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_loop_removes_and_reports() {
        let manager = NotificationManager::new();
        let mut events = manager.subscribe();
        let first = manager.push_with_duration("first", Severity::Info, Some(ms(1000)));
        let sticky = manager.push_with_duration("sticky", Severity::Info, None);

        tokio::select! {
            _ = manager.run_expiry() => unreachable!("expiry loop never returns"),
            _ = tokio::time::sleep(ms(1500)) => {}
        }

        // The loop, not a lazy read, removed the expired entry.
        assert_eq!(ids(&manager.snapshot()), vec![sticky]);

        assert!(matches!(events.try_recv(), Ok(NotificationEvent::Pushed(n)) if n.id == first));
        assert!(matches!(events.try_recv(), Ok(NotificationEvent::Pushed(n)) if n.id == sticky));
        assert_eq!(events.try_recv().ok(), Some(NotificationEvent::Expired(first)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_loop_picks_up_later_pushes() {
        let manager = NotificationManager::with_default_duration(ms(300));

        tokio::select! {
            _ = manager.run_expiry() => unreachable!("expiry loop never returns"),
            _ = async {
                tokio::time::sleep(ms(100)).await;
                manager.push("late", Severity::Success);
                assert_eq!(manager.snapshot().len(), 1);
                tokio::time::sleep(ms(350)).await;
            } => {}
        }

        assert!(manager.snapshot().is_empty());
    }

    #[test]
    fn test_dismiss_emits_event() {
        let manager = NotificationManager::new();
        let mut events = manager.subscribe();
        let id = manager.push("x", Severity::Info);
        manager.dismiss(id);
        assert!(matches!(events.try_recv(), Ok(NotificationEvent::Pushed(_))));
        assert_eq!(events.try_recv().ok(), Some(NotificationEvent::Dismissed(id)));
    }
}
