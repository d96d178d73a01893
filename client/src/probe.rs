//! Node reachability probing.

use std::sync::Mutex;

use api::NodeApi;

/// Outcome of liveness probing. `Unknown` only before the first probe has
/// completed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::EnumIs)]
pub enum Reachability {
    #[default]
    Unknown,
    Reachable,
    Unreachable,
}

/// Determines whether the node answers at all, with a single bounded-timeout
/// request against its root endpoint.
///
/// A failed probe is reported, never retried here — retry cadence belongs to
/// the session state machine and its fallback timer.
pub struct ConnectionProbe {
    api: NodeApi,
    last: Mutex<Reachability>,
}

impl ConnectionProbe {
    pub fn new(api: NodeApi) -> Self {
        Self {
            api,
            last: Mutex::new(Reachability::Unknown),
        }
    }

    pub async fn probe(&self) -> Reachability {
        let outcome = match self.api.probe_root().await {
            Ok(()) => Reachability::Reachable,
            Err(e) => {
                tracing::debug!("probe failed: {e}");
                Reachability::Unreachable
            }
        };
        *self.last.lock().unwrap() = outcome;
        outcome
    }

    /// Most recent observation.
    pub fn last(&self) -> Reachability {
        *self.last.lock().unwrap()
    }
}
