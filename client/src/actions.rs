//! User actions: one-shot REST calls whose outcomes surface through the
//! notification queue.
//!
//! Authentication failures (wrong password, unknown wallet) stay here at
//! error level and leave the session state untouched; only probe and
//! session-lookup results move the state machine.

use std::sync::Arc;

use api::ApiError;
use api::NodeApi;
use api::NodeService;

use crate::notify::Level;
use crate::notify::NotificationQueue;
use crate::session::SessionStateMachine;

#[derive(Clone)]
pub struct Actions {
    api: NodeApi,
    session: Arc<SessionStateMachine>,
    notifications: NotificationQueue,
}

impl Actions {
    pub fn new(
        api: NodeApi,
        session: Arc<SessionStateMachine>,
        notifications: NotificationQueue,
    ) -> Self {
        Self {
            api,
            session,
            notifications,
        }
    }

    /// Unlocks a wallet. On success the session check runs immediately
    /// instead of waiting for the node's `changed_default_wallet` push.
    pub async fn login(&self, name: &str, password: &str) -> bool {
        let ok = self.report(
            self.api.set_default_wallet(name, password).await,
            &format!("Unlocked wallet {name}"),
            "Could not unlock wallet",
        );
        if ok {
            self.session.on_wallet_changed().await;
        }
        ok
    }

    pub async fn logout(&self) -> bool {
        let ok = self.report(
            self.api.clear_default_wallet().await,
            "Logged out",
            "Logout failed",
        );
        if ok {
            self.session.on_wallet_changed().await;
        }
        ok
    }

    pub async fn create_wallet(&self, name: &str, password: &str) -> bool {
        self.report(
            self.api.new_wallet(name, password).await,
            &format!("Created wallet {name}"),
            "Could not create wallet",
        )
    }

    pub async fn remove_wallet(&self, name: &str, password: &str) -> bool {
        self.report(
            self.api.remove_wallet(name, password).await,
            &format!("Removed wallet {name}"),
            "Could not remove wallet",
        )
    }

    pub async fn send(&self, address: &str, amount: u64, message: &str) -> bool {
        self.report(
            self.api.send(address, amount, message).await,
            "Transaction sent",
            "Send failed",
        )
    }

    pub async fn deposit(&self, amount: u64) -> bool {
        self.report(self.api.deposit(amount).await, "Deposit sent", "Deposit failed")
    }

    pub async fn withdraw(&self, amount: u64) -> bool {
        self.report(
            self.api.withdraw(amount).await,
            "Withdrawal sent",
            "Withdrawal failed",
        )
    }

    pub async fn pool_reg(&self) -> bool {
        self.report(
            self.api.pool_reg().await,
            "Pool registration sent",
            "Pool registration failed",
        )
    }

    pub async fn application_edit(&self, mode: &str, list: &[String]) -> bool {
        self.report(
            self.api.application_edit(mode, list).await,
            "Application updated",
            "Application update failed",
        )
    }

    pub async fn job_bid(&self, auth: &str, job_id: &str, amount: u64) -> bool {
        self.report(
            self.api.job_bid(auth, job_id, amount).await,
            "Bid placed",
            "Bid failed",
        )
    }

    pub async fn start_miner(&self, wallet: Option<&str>) -> bool {
        self.report(
            self.api.start_miner(wallet).await,
            "Miner started",
            "Could not start miner",
        )
    }

    pub async fn stop_miner(&self) -> bool {
        self.report(
            self.api.stop_miner().await,
            "Miner stopped",
            "Could not stop miner",
        )
    }

    pub async fn start_power(&self) -> bool {
        self.report(
            self.api.start_power().await,
            "Power client started",
            "Could not start power client",
        )
    }

    pub async fn stop_power(&self) -> bool {
        self.report(
            self.api.stop_power().await,
            "Power client stopped",
            "Could not stop power client",
        )
    }

    pub async fn start_service(&self, service: NodeService) -> bool {
        self.report(
            self.api.start_service(service).await,
            &format!("Service {service} started"),
            "Could not start service",
        )
    }

    pub async fn stop_service(&self, service: NodeService) -> bool {
        self.report(
            self.api.stop_service(service).await,
            &format!("Service {service} stopped"),
            "Could not stop service",
        )
    }

    /// Surfaces the outcome: the node's own message when it sent one, the
    /// fallback otherwise. Returns whether the action succeeded.
    fn report(&self, result: Result<String, ApiError>, success: &str, failure: &str) -> bool {
        match result {
            Ok(message) => {
                let text = if message.is_empty() {
                    success.to_string()
                } else {
                    message
                };
                self.notifications.notify(text, Level::Success);
                true
            }
            Err(e) => {
                tracing::warn!("{failure}: {e}");
                self.notifications.notify(format!("{failure}: {e}"), Level::Error);
                false
            }
        }
    }
}
