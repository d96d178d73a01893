//! Leaf display components. Each widget owns one data domain: it fetches on
//! mount, re-fetches from scratch on every refresh trigger, and exposes a
//! snapshot for whatever shell renders it.

pub mod blocks;
pub mod mempool;
pub mod peers;
pub mod power;
pub mod wallet;

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::dispatch::DispatchToken;
use crate::dispatch::Domain;
use crate::dispatch::RefreshDispatcher;
use crate::dispatch::RefreshFn;

#[async_trait]
pub trait Widget: Send + Sync + 'static {
    /// The one domain this widget is responsible for.
    fn domain(&self) -> Domain;

    /// Lifecycle notifications backing the liveness flag.
    fn mounted(&self);
    fn unmounted(&self);

    /// Full idempotent re-fetch. Failures stay local: last-good data is kept
    /// and nothing propagates to the session or to other domains.
    async fn refresh(&self);
}

/// Data cell each widget embeds: a liveness flag plus the last successfully
/// fetched value.
///
/// In-flight requests are never aborted, so a response can land after the
/// widget unmounted; the liveness check here is what discards it.
pub struct WidgetCell<T> {
    live: AtomicBool,
    data: Mutex<Option<T>>,
}

impl<T> WidgetCell<T> {
    pub fn new() -> Self {
        Self {
            live: AtomicBool::new(false),
            data: Mutex::new(None),
        }
    }

    pub fn set_live(&self, live: bool) {
        self.live.store(live, Ordering::Release);
        if !live {
            // A remount starts from scratch, like a fresh instance would.
            self.data.lock().unwrap().take();
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Stores a fetched value; returns false when the widget is no longer
    /// mounted and the value was dropped.
    pub fn store(&self, value: T) -> bool {
        if !self.is_live() {
            return false;
        }
        *self.data.lock().unwrap() = Some(value);
        true
    }

    pub fn clear(&self) {
        self.data.lock().unwrap().take();
    }

    pub fn get(&self) -> Option<T>
    where
        T: Clone,
    {
        self.data.lock().unwrap().clone()
    }
}

impl<T> Default for WidgetCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A widget currently registered in the dispatch registry. Dropping it
/// unmounts: the registry entry goes away and late responses are discarded.
pub struct MountedWidget {
    widget: Arc<dyn Widget>,
    token: DispatchToken,
    dispatcher: Arc<RefreshDispatcher>,
}

impl Drop for MountedWidget {
    fn drop(&mut self) {
        self.dispatcher.unregister(&self.token);
        self.widget.unmounted();
    }
}

/// Mounts a widget: marks it live, registers its refresh capability and
/// issues the initial fetch.
pub fn mount(widget: Arc<dyn Widget>, dispatcher: &Arc<RefreshDispatcher>) -> MountedWidget {
    widget.mounted();
    let token = dispatcher.register(widget.domain(), refresh_capability(widget.clone()));
    let first = widget.clone();
    tokio::spawn(async move { first.refresh().await });
    MountedWidget {
        widget,
        token,
        dispatcher: dispatcher.clone(),
    }
}

/// Wraps a widget's refresh into a non-blocking capability: every trigger
/// spawns its own fetch. Two triggers in quick succession issue two fetches;
/// the widget keeps whichever completes last.
fn refresh_capability(widget: Arc<dyn Widget>) -> RefreshFn {
    Arc::new(move || {
        let widget = widget.clone();
        tokio::spawn(async move { widget.refresh().await });
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    struct CountingWidget {
        domain: Domain,
        cell: WidgetCell<u64>,
        refreshes: AtomicUsize,
    }

    impl CountingWidget {
        fn new(domain: Domain) -> Arc<Self> {
            Arc::new(Self {
                domain,
                cell: WidgetCell::new(),
                refreshes: AtomicUsize::new(0),
            })
        }

        fn refresh_count(&self) -> usize {
            self.refreshes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Widget for CountingWidget {
        fn domain(&self) -> Domain {
            self.domain
        }

        fn mounted(&self) {
            self.cell.set_live(true);
        }

        fn unmounted(&self) {
            self.cell.set_live(false);
        }

        async fn refresh(&self) {
            let n = self.refreshes.fetch_add(1, Ordering::SeqCst) as u64 + 1;
            self.cell.store(n);
        }
    }

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn mount_fetches_and_registers() {
        let dispatcher = Arc::new(RefreshDispatcher::new());
        let widget = CountingWidget::new(Domain::Blocks);

        let mounted = mount(widget.clone(), &dispatcher);
        settle().await;
        assert_eq!(widget.refresh_count(), 1);
        assert_eq!(widget.cell.get(), Some(1));

        dispatcher.dispatch(Domain::Blocks);
        settle().await;
        assert_eq!(widget.refresh_count(), 2);

        drop(mounted);
    }

    #[tokio::test]
    async fn unmount_makes_later_events_noops() {
        let dispatcher = Arc::new(RefreshDispatcher::new());
        let widget = CountingWidget::new(Domain::Peers);

        let mounted = mount(widget.clone(), &dispatcher);
        settle().await;
        drop(mounted);

        assert!(!dispatcher.dispatch(Domain::Peers));
        settle().await;
        assert_eq!(widget.refresh_count(), 1);
        assert!(widget.cell.get().is_none());
    }

    #[tokio::test]
    async fn responses_after_unmount_are_discarded() {
        let cell = WidgetCell::new();
        cell.set_live(true);
        assert!(cell.store(7));

        cell.set_live(false);
        assert!(!cell.store(8));
        assert_eq!(cell.get(), None);
    }
}
