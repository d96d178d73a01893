//! Chain status: local length against the best length heard from peers.

use api::types::BlockchainStatus;
use api::NodeApi;
use async_trait::async_trait;

use super::Widget;
use super::WidgetCell;
use crate::dispatch::Domain;

pub struct BlocksWidget {
    api: NodeApi,
    cell: WidgetCell<BlockchainStatus>,
}

impl BlocksWidget {
    pub fn new(api: NodeApi) -> Self {
        Self {
            api,
            cell: WidgetCell::new(),
        }
    }

    /// Last fetched chain status.
    pub fn status(&self) -> Option<BlockchainStatus> {
        self.cell.get()
    }
}

#[async_trait]
impl Widget for BlocksWidget {
    fn domain(&self) -> Domain {
        Domain::Blocks
    }

    fn mounted(&self) {
        self.cell.set_live(true);
    }

    fn unmounted(&self) {
        self.cell.set_live(false);
    }

    async fn refresh(&self) {
        match self.api.blockcount().await {
            Ok(status) => {
                if !self.cell.store(status) {
                    tracing::trace!("blockcount response after unmount, dropped");
                }
            }
            Err(e) => tracing::warn!("blocks refresh failed: {e}"),
        }
    }
}
