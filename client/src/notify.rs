//! Transient user-visible notifications.
//!
//! Side-effect only: enqueueing never blocks the caller and never touches
//! session state or data domains. Entries live for a fixed duration or until
//! explicitly dismissed, whichever comes first.

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use tokio::sync::watch;

/// How long a notification stays on screen unless dismissed sooner.
pub const DISPLAY_DURATION: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Level {
    Info,
    Success,
    Error,
}

/// Screen position of a notification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Position {
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    #[default]
    BottomCenter,
    BottomRight,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub level: Level,
    pub position: Position,
    pub created_at: Instant,
}

/// FIFO queue of active notifications. Cheap to clone; all clones share the
/// same queue.
#[derive(Clone)]
pub struct NotificationQueue {
    inner: Arc<Inner>,
}

struct Inner {
    entries: Mutex<Vec<Notification>>,
    changed: watch::Sender<Vec<Notification>>,
    next_id: AtomicU64,
    ttl: Duration,
}

impl NotificationQueue {
    pub fn new(ttl: Duration) -> Self {
        let (changed, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(Vec::new()),
                changed,
                next_id: AtomicU64::new(0),
                ttl,
            }),
        }
    }

    pub fn notify(&self, message: impl Into<String>, level: Level) -> u64 {
        self.notify_at(message, level, Position::default())
    }

    /// Enqueues a message and schedules its dismissal. Rapid calls all
    /// enqueue independently; there is no de-duplication.
    pub fn notify_at(&self, message: impl Into<String>, level: Level, position: Position) -> u64 {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let entry = Notification {
            id,
            message: message.into(),
            level,
            position,
            created_at: Instant::now(),
        };
        self.inner.entries.lock().unwrap().push(entry);
        self.publish();

        let queue = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(queue.inner.ttl).await;
            queue.dismiss(id);
        });
        id
    }

    /// Removes a notification early. Unknown ids are ignored, so the timer
    /// firing after an explicit dismissal is harmless.
    pub fn dismiss(&self, id: u64) {
        let removed = {
            let mut entries = self.inner.entries.lock().unwrap();
            let before = entries.len();
            entries.retain(|entry| entry.id != id);
            entries.len() != before
        };
        if removed {
            self.publish();
        }
    }

    /// Currently displayed notifications, in enqueue order.
    pub fn active(&self) -> Vec<Notification> {
        self.inner.entries.lock().unwrap().clone()
    }

    /// Watch channel for the render layer.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.inner.changed.subscribe()
    }

    fn publish(&self) {
        let _ = self.inner.changed.send(self.active());
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(DISPLAY_DURATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn entries_keep_enqueue_order_and_expire() {
        let queue = NotificationQueue::default();
        queue.notify_at("Address copied", Level::Info, Position::TopCenter);
        queue.notify("Send failed", Level::Error);

        let active = queue.active();
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].message, "Address copied");
        assert_eq!(active[0].position, Position::TopCenter);
        assert_eq!(active[1].message, "Send failed");
        assert_eq!(active[1].position, Position::BottomCenter);

        tokio::time::sleep(DISPLAY_DURATION + Duration::from_millis(10)).await;
        assert!(queue.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_dismissal_removes_only_the_target() {
        let queue = NotificationQueue::default();
        let first = queue.notify("one", Level::Info);
        queue.notify("two", Level::Success);

        queue.dismiss(first);
        let active = queue.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "two");
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_messages_are_kept_separately() {
        let queue = NotificationQueue::default();
        queue.notify("saved", Level::Success);
        queue.notify("saved", Level::Success);
        assert_eq!(queue.active().len(), 2);
    }

    #[test]
    fn positions_render_kebab_case() {
        assert_eq!(Position::BottomCenter.to_string(), "bottom-center");
        assert_eq!(Position::TopLeft.to_string(), "top-left");
        assert_eq!(Level::Error.to_string(), "error");
    }
}
