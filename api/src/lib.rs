//! Client for the Halocoin node's HTTP API and push-event channel.
//!
//! Everything that talks to the node lives here: the endpoint configuration,
//! the REST surface, the push-event vocabulary and the channel connection.
//! Session logic, dispatch and widgets live in the `client` crate.

pub mod channel;
pub mod config;
pub mod error;
pub mod events;
pub mod types;

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;

pub use crate::channel::ChannelMessage;
pub use crate::channel::PushChannel;
pub use crate::config::ApiConfig;
pub use crate::error::ApiError;
pub use crate::events::PushEvent;
use crate::types::ActionResponse;
use crate::types::Authority;
use crate::types::BlockSummary;
use crate::types::BlockchainStatus;
use crate::types::InfoWalletRaw;
use crate::types::Job;
use crate::types::MinerStatus;
use crate::types::Peer;
use crate::types::PoolTx;
use crate::types::PowerStatus;
use crate::types::SessionInfo;

/// Node services the client can start and stop remotely, besides the miner
/// and the power client which have dedicated endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum NodeService {
    Blockchain,
    PeerListen,
    PeerCheck,
}

/// REST client for a single node. Cheap to clone; all calls share one
/// connection pool and the timeouts from [`ApiConfig`].
#[derive(Clone, Debug)]
pub struct NodeApi {
    config: ApiConfig,
    http: reqwest::Client,
}

impl NodeApi {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Opens the push-event channel for this node.
    pub fn push_channel(
        &self,
    ) -> (PushChannel, tokio::sync::mpsc::UnboundedReceiver<ChannelMessage>) {
        PushChannel::connect(&self.config)
    }

    /// Liveness probe against the node's root endpoint. Any HTTP answer
    /// counts as reachable; only transport failures do not.
    pub async fn probe_root(&self) -> Result<(), ApiError> {
        self.http
            .get(self.config.url("/"))
            .timeout(self.config.probe_timeout)
            .send()
            .await?;
        Ok(())
    }

    /// Session lookup. `Some` when a default wallet is unlocked, `None`
    /// otherwise; the discriminator is the presence of an address in the
    /// response body.
    pub async fn info_wallet(&self) -> Result<Option<SessionInfo>, ApiError> {
        let raw: InfoWalletRaw = self.get_json("/info_wallet").await?;
        Ok(raw.into_session_info())
    }

    // --- listings ---

    pub async fn blockcount(&self) -> Result<BlockchainStatus, ApiError> {
        self.get_json("/blockcount").await
    }

    pub async fn block(&self, number: Option<i64>) -> Result<BlockSummary, ApiError> {
        match number {
            Some(n) => self.get_json(&format!("/block?number={n}")).await,
            None => self.get_json("/block").await,
        }
    }

    pub async fn peers(&self) -> Result<Vec<Peer>, ApiError> {
        self.get_json("/peers").await
    }

    /// Transactions currently waiting in the node's pool.
    pub async fn pool_txs(&self) -> Result<Vec<PoolTx>, ApiError> {
        self.get_json("/txs").await
    }

    pub async fn balance(&self, address: Option<&str>) -> Result<u64, ApiError> {
        match address {
            Some(addr) => self.get_json(&format!("/balance?address={addr}")).await,
            None => self.get_json("/balance").await,
        }
    }

    pub async fn available_jobs(&self) -> Result<Vec<Job>, ApiError> {
        self.get_json("/available_jobs").await
    }

    pub async fn subauths(&self) -> Result<Vec<Authority>, ApiError> {
        self.get_json("/subauths").await
    }

    // --- wallet lifecycle ---

    pub async fn wallets(&self) -> Result<Vec<String>, ApiError> {
        #[derive(Deserialize)]
        struct WalletsRaw {
            #[serde(default)]
            wallets: BTreeMap<String, String>,
        }
        let raw: WalletsRaw = self.get_json("/wallets").await?;
        Ok(raw.wallets.into_keys().collect())
    }

    pub async fn new_wallet(&self, name: &str, password: &str) -> Result<String, ApiError> {
        self.post_action(
            "/new_wallet",
            &[
                ("wallet_name", name.to_string()),
                ("password", password.to_string()),
            ],
        )
        .await
    }

    /// Unlocks a wallet as the default — the login action.
    pub async fn set_default_wallet(&self, name: &str, password: &str) -> Result<String, ApiError> {
        self.post_action(
            "/set_default_wallet",
            &[
                ("wallet_name", name.to_string()),
                ("password", password.to_string()),
            ],
        )
        .await
    }

    /// Clears the default wallet — the logout action.
    pub async fn clear_default_wallet(&self) -> Result<String, ApiError> {
        self.post_action("/set_default_wallet", &[("delete", "true".to_string())])
            .await
    }

    pub async fn remove_wallet(&self, name: &str, password: &str) -> Result<String, ApiError> {
        self.post_action(
            "/remove_wallet",
            &[
                ("wallet_name", name.to_string()),
                ("password", password.to_string()),
            ],
        )
        .await
    }

    /// Returns the wallet file content for the user to save locally.
    pub async fn download_wallet(&self, name: &str) -> Result<String, ApiError> {
        let resp = self
            .http
            .get(self.config.url(&format!("/download_wallet?wallet_name={name}")))
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(ApiError::Node {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    // --- transactional actions ---

    pub async fn send(&self, address: &str, amount: u64, message: &str) -> Result<String, ApiError> {
        self.post_action(
            "/send",
            &[
                ("address", address.to_string()),
                ("amount", amount.to_string()),
                ("message", message.to_string()),
            ],
        )
        .await
    }

    pub async fn deposit(&self, amount: u64) -> Result<String, ApiError> {
        self.post_action("/deposit", &[("amount", amount.to_string())])
            .await
    }

    pub async fn withdraw(&self, amount: u64) -> Result<String, ApiError> {
        self.post_action("/withdraw", &[("amount", amount.to_string())])
            .await
    }

    /// Registers this account into the mining pool.
    pub async fn pool_reg(&self) -> Result<String, ApiError> {
        self.post_action("/tx/pool_reg", &[]).await
    }

    /// Rewrites the account's job application (mode plus authority list).
    pub async fn application_edit(&self, mode: &str, list: &[String]) -> Result<String, ApiError> {
        self.post_action(
            "/tx/application",
            &[("mode", mode.to_string()), ("list", list.join(","))],
        )
        .await
    }

    pub async fn job_bid(&self, auth: &str, job_id: &str, amount: u64) -> Result<String, ApiError> {
        self.post_action(
            "/tx/job_bid",
            &[
                ("auth", auth.to_string()),
                ("job_id", job_id.to_string()),
                ("amount", amount.to_string()),
            ],
        )
        .await
    }

    // --- service control ---

    pub async fn start_miner(&self, wallet: Option<&str>) -> Result<String, ApiError> {
        match wallet {
            Some(name) => self.get_action(&format!("/start_miner?wallet={name}")).await,
            None => self.get_action("/start_miner").await,
        }
    }

    pub async fn stop_miner(&self) -> Result<String, ApiError> {
        self.get_action("/stop_miner").await
    }

    pub async fn miner_status(&self) -> Result<MinerStatus, ApiError> {
        self.get_json("/status_miner").await
    }

    pub async fn start_power(&self) -> Result<String, ApiError> {
        self.get_action("/start_power").await
    }

    pub async fn stop_power(&self) -> Result<String, ApiError> {
        self.get_action("/stop_power").await
    }

    pub async fn power_status(&self) -> Result<PowerStatus, ApiError> {
        self.get_json("/status_power").await
    }

    pub async fn start_service(&self, service: NodeService) -> Result<String, ApiError> {
        self.get_action(&format!("/start_{service}")).await
    }

    pub async fn stop_service(&self, service: NodeService) -> Result<String, ApiError> {
        self.get_action(&format!("/stop_{service}")).await
    }

    // --- plumbing ---

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.http.get(self.config.url(path)).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(ApiError::Node {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_action(&self, path: &str) -> Result<String, ApiError> {
        let resp = self.http.get(self.config.url(path)).send().await?;
        Self::into_ack(resp).await
    }

    async fn post_action(&self, path: &str, form: &[(&str, String)]) -> Result<String, ApiError> {
        let resp = self
            .http
            .post(self.config.url(path))
            .form(form)
            .send()
            .await?;
        Self::into_ack(resp).await
    }

    /// Unwraps the node's `{success, message}` envelope; a processed-but-
    /// declined request becomes [`ApiError::Rejected`].
    async fn into_ack(resp: reqwest::Response) -> Result<String, ApiError> {
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(ApiError::Node {
                status: status.as_u16(),
                body,
            });
        }
        let ack: ActionResponse = serde_json::from_str(&body)?;
        if ack.success {
            Ok(ack.message.unwrap_or_default())
        } else {
            Err(ApiError::Rejected(
                ack.message
                    .unwrap_or_else(|| "request rejected by node".to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_names_follow_endpoint_spelling() {
        assert_eq!(NodeService::PeerListen.to_string(), "peer_listen");
        assert_eq!(NodeService::PeerCheck.to_string(), "peer_check");
        assert_eq!(NodeService::Blockchain.to_string(), "blockchain");
    }
}
