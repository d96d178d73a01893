//! Exercises of the synchronization core working together: state machine,
//! dispatch registry, router and widgets against scripted backends.

use std::collections::VecDeque;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use api::types::AccountSnapshot;
use api::types::SessionInfo;
use api::types::WalletSummary;
use api::ApiError;
use api::ChannelMessage;
use api::PushEvent;
use async_trait::async_trait;
use client::dispatch::Domain;
use client::dispatch::RefreshDispatcher;
use client::probe::Reachability;
use client::router::PushEventRouter;
use client::session::SessionSource;
use client::session::SessionStateMachine;
use client::widgets::mount;
use client::widgets::Widget;
use client::widgets::WidgetCell;

/// Scripted probe/session backend; defaults to "node down" when exhausted.
struct Script {
    probes: Mutex<VecDeque<Reachability>>,
    sessions: Mutex<VecDeque<Result<Option<SessionInfo>, ApiError>>>,
}

impl Script {
    fn new(
        probes: impl IntoIterator<Item = Reachability>,
        sessions: impl IntoIterator<Item = Result<Option<SessionInfo>, ApiError>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            probes: Mutex::new(probes.into_iter().collect()),
            sessions: Mutex::new(sessions.into_iter().collect()),
        })
    }
}

#[async_trait]
impl SessionSource for Script {
    async fn probe(&self) -> Reachability {
        self.probes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Reachability::Unreachable)
    }

    async fn session_info(&self) -> Result<Option<SessionInfo>, ApiError> {
        self.sessions.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }
}

fn session_fixture() -> SessionInfo {
    SessionInfo {
        wallet: WalletSummary {
            name: "alice".to_string(),
            address: "ha1xyz".to_string(),
        },
        account: AccountSnapshot::default(),
    }
}

/// A widget that counts its refreshes and stores the count as its data.
struct TestWidget {
    domain: Domain,
    refreshes: AtomicUsize,
    cell: WidgetCell<usize>,
}

impl TestWidget {
    fn new(domain: Domain) -> Arc<Self> {
        Arc::new(Self {
            domain,
            refreshes: AtomicUsize::new(0),
            cell: WidgetCell::new(),
        })
    }

    fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Widget for TestWidget {
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
        let n = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
        self.cell.store(n);
    }
}

fn trace_init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("client=debug")
        .with_test_writer()
        .try_init();
}

/// Lets spawned refresh tasks run to completion on the test runtime.
async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

fn authenticated_machine() -> Arc<SessionStateMachine> {
    Arc::new(SessionStateMachine::new(Script::new(
        [Reachability::Reachable],
        [Ok(Some(session_fixture()))],
    )))
}

#[tokio::test]
async fn peer_update_refreshes_only_the_peers_widget() {
    trace_init();
    let session = authenticated_machine();
    session.start().await;

    let dispatcher = Arc::new(RefreshDispatcher::new());
    let blocks = TestWidget::new(Domain::Blocks);
    let peers = TestWidget::new(Domain::Peers);
    let _mounted_blocks = mount(blocks.clone(), &dispatcher);
    let _mounted_peers = mount(peers.clone(), &dispatcher);
    settle().await;

    let router = PushEventRouter::new(dispatcher, session);
    router
        .handle(ChannelMessage::Event(PushEvent::PeerUpdate))
        .await;
    settle().await;

    assert_eq!(peers.refresh_count(), 2);
    assert_eq!(blocks.refresh_count(), 1);
    // The blocks widget's last data is untouched by the peer event.
    assert_eq!(blocks.cell.get(), Some(1));
}

#[tokio::test]
async fn new_block_fans_out_to_the_block_set_and_no_others() {
    let session = authenticated_machine();
    session.start().await;

    let dispatcher = Arc::new(RefreshDispatcher::new());
    let blocks = TestWidget::new(Domain::Blocks);
    let mempool = TestWidget::new(Domain::Mempool);
    let wallet = TestWidget::new(Domain::Wallet);
    let peers = TestWidget::new(Domain::Peers);
    let _m1 = mount(blocks.clone(), &dispatcher);
    let _m2 = mount(mempool.clone(), &dispatcher);
    let _m3 = mount(wallet.clone(), &dispatcher);
    let _m4 = mount(peers.clone(), &dispatcher);
    settle().await;

    let router = PushEventRouter::new(dispatcher, session);
    router
        .handle(ChannelMessage::Event(PushEvent::NewBlock))
        .await;
    settle().await;

    assert_eq!(blocks.refresh_count(), 2);
    assert_eq!(mempool.refresh_count(), 2);
    assert_eq!(wallet.refresh_count(), 2);
    assert_eq!(peers.refresh_count(), 1);
}

#[tokio::test]
async fn events_for_unmounted_domains_are_noops() {
    let session = authenticated_machine();
    session.start().await;

    let dispatcher = Arc::new(RefreshDispatcher::new());
    let peers = TestWidget::new(Domain::Peers);
    let mounted = mount(peers.clone(), &dispatcher);
    settle().await;
    drop(mounted);

    let router = PushEventRouter::new(dispatcher, session);
    router
        .handle(ChannelMessage::Event(PushEvent::PeerUpdate))
        .await;
    settle().await;

    // Dropped, not queued: the initial mount fetch remains the only one.
    assert_eq!(peers.refresh_count(), 1);
}

#[tokio::test]
async fn outage_then_reconnect_lands_in_no_session() {
    trace_init();
    let session = Arc::new(SessionStateMachine::new(Script::new(
        [Reachability::Unreachable, Reachability::Reachable],
        [Ok(None)],
    )));
    session.start().await;
    assert!(session.state().is_unreachable());

    let dispatcher = Arc::new(RefreshDispatcher::new());
    let router = PushEventRouter::new(dispatcher, session.clone());

    // Channel reconnects: probe re-runs, session check says "no wallet".
    router.handle(ChannelMessage::Connected).await;
    assert!(session.state().is_no_session());

    router.handle(ChannelMessage::Disconnected).await;
    assert!(session.state().is_unreachable());
}

#[tokio::test]
async fn wallet_change_refreshes_the_widget_and_rederives_the_session() {
    let session = Arc::new(SessionStateMachine::new(Script::new(
        [Reachability::Reachable],
        [Ok(Some(session_fixture())), Ok(None)],
    )));
    session.start().await;
    assert!(session.state().is_authenticated());

    let dispatcher = Arc::new(RefreshDispatcher::new());
    let wallet = TestWidget::new(Domain::Wallet);
    let _mounted = mount(wallet.clone(), &dispatcher);
    settle().await;

    let router = PushEventRouter::new(dispatcher, session.clone());
    router
        .handle(ChannelMessage::Event(PushEvent::ChangedDefaultWallet))
        .await;
    settle().await;

    assert_eq!(wallet.refresh_count(), 2);
    // The node reported no wallet on the follow-up check: logged out.
    assert!(session.state().is_no_session());
}
