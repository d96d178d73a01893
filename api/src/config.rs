//! Node endpoint configuration shared by every REST call and the push
//! channel. One struct, threaded through; never duplicated per call site.

use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:7001";

/// Where the node lives and how long we are willing to wait for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL of the node's HTTP API, e.g. `http://127.0.0.1:7001`.
    pub base_url: String,
    /// Timeout applied to every data request.
    pub request_timeout: Duration,
    /// Timeout for the liveness probe. Kept short so an unreachable node is
    /// detected within a UI-acceptable delay.
    pub probe_timeout: Duration,
    /// Cadence of the fallback probe while the node is not reachable.
    pub probe_interval: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Reads `HALOCOIN_API_URL`, falling back to the default local node.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("HALOCOIN_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    /// Absolute URL for a REST path.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// WebSocket URL of the node's push-event channel.
    pub fn events_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let ws = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            format!("ws://{base}")
        };
        format!("{ws}/events")
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            probe_timeout: Duration::from_secs(2),
            probe_interval: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_doubled_slashes() {
        let config = ApiConfig::new("http://10.0.0.5:7001/");
        assert_eq!(config.url("/info_wallet"), "http://10.0.0.5:7001/info_wallet");
        assert_eq!(config.url("peers"), "http://10.0.0.5:7001/peers");
    }

    #[test]
    fn events_url_switches_scheme() {
        assert_eq!(
            ApiConfig::new("http://10.0.0.5:7001").events_url(),
            "ws://10.0.0.5:7001/events"
        );
        assert_eq!(
            ApiConfig::new("https://node.example").events_url(),
            "wss://node.example/events"
        );
    }
}
