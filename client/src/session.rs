//! Top-level session state: the sole gate for which view tree is mounted.

use std::ops::Deref;
use std::sync::Arc;

use api::types::SessionInfo;
use api::ApiError;
use async_trait::async_trait;
use tokio::sync::watch;

use crate::probe::Reachability;

/// The active wallet identity and account snapshot.
///
/// Owned exclusively by the state machine and replaced wholesale on every
/// successful session refresh; widgets read it, never write it.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionContext(Arc<SessionInfo>);

impl SessionContext {
    pub fn new(info: SessionInfo) -> Self {
        Self(Arc::new(info))
    }
}

impl Deref for SessionContext {
    type Target = SessionInfo;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// The application's top-level mode. Exactly one is active at a time.
#[derive(Clone, Debug, PartialEq, strum::EnumIs)]
pub enum SessionState {
    Connecting,
    Unreachable,
    NoSession,
    Authenticated(SessionContext),
}

impl SessionState {
    fn name(&self) -> &'static str {
        match self {
            SessionState::Connecting => "connecting",
            SessionState::Unreachable => "unreachable",
            SessionState::NoSession => "no-session",
            SessionState::Authenticated(_) => "authenticated",
        }
    }
}

/// Where probe and session-lookup answers come from. The application wires
/// this to the node API; tests script it.
#[async_trait]
pub trait SessionSource: Send + Sync {
    async fn probe(&self) -> Reachability;
    async fn session_info(&self) -> Result<Option<SessionInfo>, ApiError>;
}

/// Derives the session state from probe results and the session lookup.
///
/// Transitions are driven only by those two inputs; widgets never mutate the
/// state directly. Observers subscribe to the watch channel and mount or
/// unmount their view trees on changes.
pub struct SessionStateMachine {
    source: Arc<dyn SessionSource>,
    tx: watch::Sender<SessionState>,
}

impl SessionStateMachine {
    pub fn new(source: Arc<dyn SessionSource>) -> Self {
        let (tx, _) = watch::channel(SessionState::Connecting);
        Self { source, tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    /// Context of the authenticated session, if any.
    pub fn context(&self) -> Option<SessionContext> {
        match &*self.tx.borrow() {
            SessionState::Authenticated(ctx) => Some(ctx.clone()),
            _ => None,
        }
    }

    /// Initial derivation at application start.
    pub async fn start(&self) {
        self.revalidate().await;
    }

    /// Full re-derivation: probe first, session check if reachable.
    pub async fn revalidate(&self) {
        match self.source.probe().await {
            Reachability::Reachable => self.check_session().await,
            _ => self.set(SessionState::Unreachable),
        }
    }

    /// The push channel came (back) up. Missed events are not backfilled;
    /// this re-validation is the sole recovery for the gap.
    pub async fn on_channel_connect(&self) {
        self.revalidate().await;
    }

    /// The push channel dropped: the node is treated as down, from any state.
    pub fn on_channel_disconnect(&self) {
        self.set(SessionState::Unreachable);
    }

    /// The node reported a default-wallet change; re-run the session check.
    pub async fn on_wallet_changed(&self) {
        self.check_session().await;
    }

    /// Manual retry from the unreachable view.
    pub async fn retry(&self) {
        self.revalidate().await;
    }

    async fn check_session(&self) {
        match self.source.session_info().await {
            Ok(Some(info)) => self.set(SessionState::Authenticated(SessionContext::new(info))),
            Ok(None) => self.set(SessionState::NoSession),
            Err(e) => {
                // "Can't verify" collapses into "treat as down"; it surfaces
                // through the unreachable view, not a distinct error state.
                tracing::warn!("session check failed: {e}");
                self.set(SessionState::Unreachable);
            }
        }
    }

    fn set(&self, next: SessionState) {
        let prev = self.tx.send_replace(next.clone());
        if std::mem::discriminant(&prev) != std::mem::discriminant(&next) {
            tracing::info!(from = prev.name(), to = next.name(), "session transition");
        }
    }
}
