//! The default wallet's identity, balance and account snapshot.

use api::types::SessionInfo;
use api::NodeApi;
use async_trait::async_trait;

use super::Widget;
use super::WidgetCell;
use crate::dispatch::Domain;

pub struct WalletWidget {
    api: NodeApi,
    cell: WidgetCell<SessionInfo>,
}

impl WalletWidget {
    pub fn new(api: NodeApi) -> Self {
        Self {
            api,
            cell: WidgetCell::new(),
        }
    }

    /// The displayed wallet, `None` while loading or when no wallet is
    /// unlocked.
    pub fn wallet(&self) -> Option<SessionInfo> {
        self.cell.get()
    }
}

#[async_trait]
impl Widget for WalletWidget {
    fn domain(&self) -> Domain {
        Domain::Wallet
    }

    fn mounted(&self) {
        self.cell.set_live(true);
    }

    fn unmounted(&self) {
        self.cell.set_live(false);
    }

    async fn refresh(&self) {
        match self.api.info_wallet().await {
            Ok(Some(info)) => {
                if !self.cell.store(info) {
                    tracing::trace!("wallet info after unmount, dropped");
                }
            }
            // The wallet was locked between trigger and response.
            Ok(None) => self.cell.clear(),
            Err(e) => tracing::warn!("wallet refresh failed: {e}"),
        }
    }
}
