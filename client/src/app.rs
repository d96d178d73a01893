//! Composition root: wires the probe, session machine, dispatch registry,
//! push channel, router and widgets together.

use std::mem;
use std::sync::Arc;

use api::types::SessionInfo;
use api::ApiConfig;
use api::ApiError;
use api::NodeApi;
use api::PushChannel;
use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::actions::Actions;
use crate::dispatch::RefreshDispatcher;
use crate::notify::NotificationQueue;
use crate::probe::ConnectionProbe;
use crate::probe::Reachability;
use crate::router::PushEventRouter;
use crate::session::SessionSource;
use crate::session::SessionState;
use crate::session::SessionStateMachine;
use crate::widgets::blocks::BlocksWidget;
use crate::widgets::mempool::MempoolWidget;
use crate::widgets::mount;
use crate::widgets::peers::PeersWidget;
use crate::widgets::power::PowerWidget;
use crate::widgets::wallet::WalletWidget;
use crate::widgets::MountedWidget;
use crate::widgets::Widget;

/// Probe and session lookup against the real node.
struct NodeBackend {
    probe: ConnectionProbe,
    api: NodeApi,
}

#[async_trait]
impl SessionSource for NodeBackend {
    async fn probe(&self) -> Reachability {
        self.probe.probe().await
    }

    async fn session_info(&self) -> Result<Option<SessionInfo>, ApiError> {
        self.api.info_wallet().await
    }
}

/// The widget singletons. Each owns one domain for the lifetime of the
/// application and is mounted or unmounted as the session state dictates.
pub struct Widgets {
    pub wallet: Arc<WalletWidget>,
    pub blocks: Arc<BlocksWidget>,
    pub peers: Arc<PeersWidget>,
    pub mempool: Arc<MempoolWidget>,
    pub power: Arc<PowerWidget>,
}

pub struct App {
    api: NodeApi,
    session: Arc<SessionStateMachine>,
    dispatcher: Arc<RefreshDispatcher>,
    notifications: NotificationQueue,
    widgets: Arc<Widgets>,
    channel: Option<PushChannel>,
    tasks: Vec<JoinHandle<()>>,
}

impl App {
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let api = NodeApi::new(config)?;
        let backend = NodeBackend {
            probe: ConnectionProbe::new(api.clone()),
            api: api.clone(),
        };
        let session = Arc::new(SessionStateMachine::new(Arc::new(backend)));
        let widgets = Arc::new(Widgets {
            wallet: Arc::new(WalletWidget::new(api.clone())),
            blocks: Arc::new(BlocksWidget::new(api.clone())),
            peers: Arc::new(PeersWidget::new(api.clone())),
            mempool: Arc::new(MempoolWidget::new(api.clone())),
            power: Arc::new(PowerWidget::new(api.clone())),
        });
        Ok(Self {
            api,
            session,
            dispatcher: Arc::new(RefreshDispatcher::new()),
            notifications: NotificationQueue::default(),
            widgets,
            channel: None,
            tasks: Vec::new(),
        })
    }

    pub fn api(&self) -> &NodeApi {
        &self.api
    }

    pub fn session(&self) -> &Arc<SessionStateMachine> {
        &self.session
    }

    pub fn widgets(&self) -> &Arc<Widgets> {
        &self.widgets
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn actions(&self) -> Actions {
        Actions::new(
            self.api.clone(),
            self.session.clone(),
            self.notifications.clone(),
        )
    }

    /// Starts the background machinery: the push channel and its router, the
    /// view loop that mounts widgets per session state, the fallback probe,
    /// and the initial session derivation.
    pub fn start(&mut self) {
        let (channel, rx) = self.api.push_channel();
        self.channel = Some(channel);

        let router = PushEventRouter::new(self.dispatcher.clone(), self.session.clone());
        self.tasks.push(tokio::spawn(async move {
            router.run(rx).await;
        }));

        self.tasks.push(tokio::spawn(view_loop(
            self.session.subscribe(),
            self.dispatcher.clone(),
            self.widgets.clone(),
        )));

        // Fallback polling exists only for the probe; reachable operation is
        // event-driven through the push channel.
        let session = self.session.clone();
        let interval = self.api.config().probe_interval;
        self.tasks.push(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let state = session.state();
                if state.is_connecting() || state.is_unreachable() {
                    session.revalidate().await;
                }
            }
        }));

        let session = self.session.clone();
        self.tasks.push(tokio::spawn(async move {
            session.start().await;
        }));
    }

    /// Application shutdown: tears down the push channel and every
    /// background task.
    pub fn shutdown(mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        if let Some(channel) = self.channel.take() {
            channel.shutdown();
        }
    }
}

/// The widgets each state's view tree contains.
fn view_tree(state: &SessionState, widgets: &Widgets) -> Vec<Arc<dyn Widget>> {
    match state {
        SessionState::Authenticated(_) => vec![
            widgets.wallet.clone() as Arc<dyn Widget>,
            widgets.blocks.clone(),
            widgets.peers.clone(),
            widgets.mempool.clone(),
            widgets.power.clone(),
        ],
        // The wallet chooser still shows chain progress.
        SessionState::NoSession => vec![widgets.blocks.clone() as Arc<dyn Widget>],
        SessionState::Connecting | SessionState::Unreachable => Vec::new(),
    }
}

/// Swaps the mounted widget set whenever the session state changes kind.
/// The old tree is dropped (and unregistered) before the new one registers.
async fn view_loop(
    mut rx: watch::Receiver<SessionState>,
    dispatcher: Arc<RefreshDispatcher>,
    widgets: Arc<Widgets>,
) {
    let initial = rx.borrow_and_update().clone();
    let mut kind = mem::discriminant(&initial);
    let mut mounted: Vec<MountedWidget> = view_tree(&initial, &widgets)
        .into_iter()
        .map(|widget| mount(widget, &dispatcher))
        .collect();

    while rx.changed().await.is_ok() {
        let state = rx.borrow_and_update().clone();
        let next = mem::discriminant(&state);
        if next == kind {
            // Context refresh within the same mode; no view swap.
            continue;
        }
        kind = next;
        mounted.clear();
        mounted.extend(
            view_tree(&state, &widgets)
                .into_iter()
                .map(|widget| mount(widget, &dispatcher)),
        );
    }
}
