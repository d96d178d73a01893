//! Transactions waiting in the node's pool.

use api::types::PoolTx;
use api::NodeApi;
use async_trait::async_trait;

use super::Widget;
use super::WidgetCell;
use crate::dispatch::Domain;

pub struct MempoolWidget {
    api: NodeApi,
    cell: WidgetCell<Vec<PoolTx>>,
}

impl MempoolWidget {
    pub fn new(api: NodeApi) -> Self {
        Self {
            api,
            cell: WidgetCell::new(),
        }
    }

    pub fn txs(&self) -> Option<Vec<PoolTx>> {
        self.cell.get()
    }
}

#[async_trait]
impl Widget for MempoolWidget {
    fn domain(&self) -> Domain {
        Domain::Mempool
    }

    fn mounted(&self) {
        self.cell.set_live(true);
    }

    fn unmounted(&self) {
        self.cell.set_live(false);
    }

    async fn refresh(&self) {
        match self.api.pool_txs().await {
            Ok(txs) => {
                if !self.cell.store(txs) {
                    tracing::trace!("pool listing after unmount, dropped");
                }
            }
            Err(e) => tracing::warn!("mempool refresh failed: {e}"),
        }
    }
}
