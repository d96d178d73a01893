//! The node's current peer table.

use api::types::Peer;
use api::NodeApi;
use async_trait::async_trait;

use super::Widget;
use super::WidgetCell;
use crate::dispatch::Domain;

pub struct PeersWidget {
    api: NodeApi,
    cell: WidgetCell<Vec<Peer>>,
}

impl PeersWidget {
    pub fn new(api: NodeApi) -> Self {
        Self {
            api,
            cell: WidgetCell::new(),
        }
    }

    pub fn peers(&self) -> Option<Vec<Peer>> {
        self.cell.get()
    }
}

#[async_trait]
impl Widget for PeersWidget {
    fn domain(&self) -> Domain {
        Domain::Peers
    }

    fn mounted(&self) {
        self.cell.set_live(true);
    }

    fn unmounted(&self) {
        self.cell.set_live(false);
    }

    async fn refresh(&self) {
        match self.api.peers().await {
            Ok(mut peers) => {
                // Best-ranked peers first; rank 0 is the tracker's ideal.
                peers.sort_by(|a, b| a.rank.total_cmp(&b.rank));
                if !self.cell.store(peers) {
                    tracing::trace!("peer listing after unmount, dropped");
                }
            }
            Err(e) => tracing::warn!("peers refresh failed: {e}"),
        }
    }
}
