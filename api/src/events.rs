//! The push-event vocabulary the node may emit over its event channel.

use serde::Deserialize;
use serde::Serialize;

use crate::types::PowerStatus;

/// One push event, fire-and-forget, no acknowledgement.
///
/// Wire form is `{"event": "...", "data": {...}}`; events without a payload
/// arrive as a bare `{"event": "..."}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum PushEvent {
    NewBlock,
    PeerUpdate,
    NewTxInPool,
    ChangedDefaultWallet,
    PowerStatus(PowerStatus),
    CpuUsage { value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_events_parse_without_payload() {
        let event: PushEvent = serde_json::from_str(r#"{"event": "new_block"}"#).unwrap();
        assert_eq!(event, PushEvent::NewBlock);

        let event: PushEvent =
            serde_json::from_str(r#"{"event": "changed_default_wallet"}"#).unwrap();
        assert_eq!(event, PushEvent::ChangedDefaultWallet);
    }

    #[test]
    fn power_status_carries_its_payload() {
        let event: PushEvent = serde_json::from_str(
            r#"{"event": "power_status", "data": {"running": true, "status": "executing", "description": "job 42"}}"#,
        )
        .unwrap();
        let PushEvent::PowerStatus(status) = event else {
            panic!("wrong variant");
        };
        assert!(status.running);
        assert_eq!(status.status, "executing");
    }

    #[test]
    fn cpu_usage_carries_a_value() {
        let event: PushEvent =
            serde_json::from_str(r#"{"event": "cpu_usage", "data": {"value": 62.5}}"#).unwrap();
        assert_eq!(event, PushEvent::CpuUsage { value: 62.5 });
    }

    #[test]
    fn unknown_events_are_rejected() {
        assert!(serde_json::from_str::<PushEvent>(r#"{"event": "solar_flare"}"#).is_err());
    }
}
