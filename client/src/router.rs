//! Routes push events to refresh targets and session re-derivation.

use std::sync::Arc;

use api::ChannelMessage;
use api::PushEvent;
use tokio::sync::mpsc;

use crate::dispatch::Domain;
use crate::dispatch::RefreshDispatcher;
use crate::session::SessionStateMachine;

/// Static invalidation table: the domains an event makes stale.
///
/// A new block moves the chain tip, clears pooled transactions and can move
/// the active wallet's balance, so it fans out to all three.
pub fn invalidated_domains(event: &PushEvent) -> &'static [Domain] {
    match event {
        PushEvent::NewBlock => &[Domain::Blocks, Domain::Mempool, Domain::Wallet],
        PushEvent::PeerUpdate => &[Domain::Peers],
        PushEvent::NewTxInPool => &[Domain::Mempool],
        PushEvent::ChangedDefaultWallet => &[Domain::Wallet],
        PushEvent::PowerStatus(_) | PushEvent::CpuUsage { .. } => &[Domain::Power],
    }
}

/// Consumes the push channel and fans each event out to the widgets that own
/// the invalidated domains, independent of which view is currently mounted.
pub struct PushEventRouter {
    dispatcher: Arc<RefreshDispatcher>,
    session: Arc<SessionStateMachine>,
}

impl PushEventRouter {
    pub fn new(dispatcher: Arc<RefreshDispatcher>, session: Arc<SessionStateMachine>) -> Self {
        Self {
            dispatcher,
            session,
        }
    }

    /// Runs until the channel closes. Messages are handled strictly in
    /// arrival order; each handler runs to completion before the next one
    /// starts, with no reordering or coalescing.
    pub async fn run(&self, mut rx: mpsc::UnboundedReceiver<ChannelMessage>) {
        while let Some(message) = rx.recv().await {
            self.handle(message).await;
        }
    }

    /// Processes one channel message. Refresh triggers are fire-and-forget:
    /// two triggers in quick succession issue two fetches, and the widget
    /// keeps whichever completes last.
    pub async fn handle(&self, message: ChannelMessage) {
        match message {
            ChannelMessage::Connected => self.session.on_channel_connect().await,
            ChannelMessage::Disconnected => self.session.on_channel_disconnect(),
            ChannelMessage::Event(event) => {
                tracing::debug!(?event, "push event");
                for domain in invalidated_domains(&event) {
                    self.dispatcher.dispatch(*domain);
                }
                if event == PushEvent::ChangedDefaultWallet {
                    self.session.on_wallet_changed().await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_block_invalidates_the_block_set() {
        let domains = invalidated_domains(&PushEvent::NewBlock);
        assert!(domains.contains(&Domain::Blocks));
        assert!(domains.contains(&Domain::Mempool));
        assert!(domains.contains(&Domain::Wallet));
        assert!(!domains.contains(&Domain::Peers));
    }

    #[test]
    fn peer_update_touches_only_peers() {
        assert_eq!(invalidated_domains(&PushEvent::PeerUpdate), &[Domain::Peers]);
    }

    #[test]
    fn power_events_share_the_power_domain() {
        assert_eq!(
            invalidated_domains(&PushEvent::CpuUsage { value: 40.0 }),
            &[Domain::Power]
        );
        assert_eq!(
            invalidated_domains(&PushEvent::PowerStatus(Default::default())),
            &[Domain::Power]
        );
    }
}
