//! Wire types for the node's REST responses.
//!
//! Shapes follow what the node actually serves; fields the node may omit are
//! defaulted rather than erroring, since listings are display data.

use serde::Deserialize;
use serde::Serialize;

/// Identity of the unlocked wallet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WalletSummary {
    pub name: String,
    pub address: String,
}

/// Job currently assigned to this account by a sub-authority.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssignedJob {
    pub auth: String,
    pub job_id: String,
}

/// The account's job-application entry: which mode it applied in and the
/// authorities it applied to.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub list: Vec<String>,
}

/// Account snapshot attached to the active wallet.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    #[serde(default)]
    pub balance: u64,
    #[serde(default)]
    pub score: u64,
    #[serde(default)]
    pub assigned_job: Option<AssignedJob>,
    #[serde(default)]
    pub application: JobApplication,
}

/// Result of a successful session lookup: the active wallet plus its
/// account snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub wallet: WalletSummary,
    pub account: AccountSnapshot,
}

/// Raw `/info_wallet` body. The node answers with wallet fields when a
/// default wallet is set and an address-less body otherwise; presence of
/// `address` is the session discriminator.
#[derive(Debug, Deserialize)]
pub(crate) struct InfoWalletRaw {
    pub name: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub balance: u64,
    #[serde(default)]
    pub score: u64,
    #[serde(default)]
    pub assigned_job: Option<AssignedJob>,
    #[serde(default)]
    pub application: JobApplication,
}

impl InfoWalletRaw {
    pub(crate) fn into_session_info(self) -> Option<SessionInfo> {
        let address = self.address?;
        Some(SessionInfo {
            wallet: WalletSummary {
                name: self.name.unwrap_or_default(),
                address,
            },
            account: AccountSnapshot {
                balance: self.balance,
                score: self.score,
                assigned_job: self.assigned_job,
                application: self.application,
            },
        })
    }
}

/// `/blockcount` body: local chain length and the best length heard from
/// peers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockchainStatus {
    pub length: i64,
    #[serde(default)]
    pub known_length: i64,
}

impl BlockchainStatus {
    pub fn is_synced(&self) -> bool {
        self.length >= self.known_length
    }
}

/// One entry of the `/peers` listing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Peer {
    pub ip: String,
    pub port: u16,
    #[serde(default)]
    pub rank: f64,
    #[serde(default)]
    pub length: i64,
}

/// One transaction in the `/txs` mempool listing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolTx {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub amount: u64,
    #[serde(default)]
    pub message: Option<String>,
}

/// A block as served by `/block`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub length: i64,
    #[serde(default)]
    pub time: f64,
    #[serde(default)]
    pub txs: Vec<PoolTx>,
}

/// One entry of the `/available_jobs` listing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub auth: String,
    #[serde(default)]
    pub amount: u64,
    #[serde(default)]
    pub status: Option<String>,
}

/// One entry of the `/subauths` listing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Authority {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub supply: u64,
}

/// `/status_power` body; also the payload of the `power_status` push event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerStatus {
    pub running: bool,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub description: String,
}

/// `/status_miner` body.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MinerStatus {
    pub running: bool,
    #[serde(default)]
    pub cpu: f64,
}

/// Envelope the node wraps around mutating calls.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ActionResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
