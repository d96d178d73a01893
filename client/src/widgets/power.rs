//! Power client and miner status, the mining/power control panel's data.

use api::types::MinerStatus;
use api::types::PowerStatus;
use api::NodeApi;
use async_trait::async_trait;

use super::Widget;
use super::WidgetCell;
use crate::dispatch::Domain;

/// Combined snapshot of the two services the panel displays.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PowerView {
    pub power: PowerStatus,
    pub miner: MinerStatus,
}

pub struct PowerWidget {
    api: NodeApi,
    cell: WidgetCell<PowerView>,
}

impl PowerWidget {
    pub fn new(api: NodeApi) -> Self {
        Self {
            api,
            cell: WidgetCell::new(),
        }
    }

    pub fn view(&self) -> Option<PowerView> {
        self.cell.get()
    }
}

#[async_trait]
impl Widget for PowerWidget {
    fn domain(&self) -> Domain {
        Domain::Power
    }

    fn mounted(&self) {
        self.cell.set_live(true);
    }

    fn unmounted(&self) {
        self.cell.set_live(false);
    }

    async fn refresh(&self) {
        let (power, miner) = tokio::join!(self.api.power_status(), self.api.miner_status());
        match (power, miner) {
            (Ok(power), Ok(miner)) => {
                if !self.cell.store(PowerView { power, miner }) {
                    tracing::trace!("power status after unmount, dropped");
                }
            }
            (Err(e), _) | (_, Err(e)) => tracing::warn!("power refresh failed: {e}"),
        }
    }
}
