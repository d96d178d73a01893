//! The single long-lived push-channel connection.
//!
//! One WebSocket per application instance. The reader task owns reconnection
//! with capped backoff; consumers only ever see `Connected`, `Disconnected`
//! and parsed events, in arrival order. Missed events during a gap are not
//! backfilled — session re-validation after `Connected` is the recovery path.

use std::time::Duration;

use futures_util::SinkExt;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::config::ApiConfig;
use crate::events::PushEvent;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// What the channel delivers to its consumer.
#[derive(Clone, Debug, PartialEq)]
pub enum ChannelMessage {
    Connected,
    Disconnected,
    Event(PushEvent),
}

/// Handle to the channel's reader task. Dropping the handle leaves the task
/// running; `shutdown` tears the connection down for good.
pub struct PushChannel {
    task: JoinHandle<()>,
}

impl PushChannel {
    /// Opens the channel and returns the stream of messages. The connection
    /// is retried forever until `shutdown`; every successful (re)connect is
    /// reported as `Connected`.
    pub fn connect(config: &ApiConfig) -> (Self, mpsc::UnboundedReceiver<ChannelMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_channel(config.events_url(), tx));
        (Self { task }, rx)
    }

    /// Application shutdown. The subscription is never torn down per-view.
    pub fn shutdown(self) {
        self.task.abort();
    }
}

async fn run_channel(url: String, tx: mpsc::UnboundedSender<ChannelMessage>) {
    let mut backoff = INITIAL_BACKOFF;
    loop {
        match connect_async(url.as_str()).await {
            Ok((mut ws, _)) => {
                backoff = INITIAL_BACKOFF;
                tracing::info!(%url, "push channel connected");
                if tx.send(ChannelMessage::Connected).is_err() {
                    return;
                }
                while let Some(frame) = ws.next().await {
                    match frame {
                        Ok(Message::Text(raw)) => match serde_json::from_str::<PushEvent>(&raw) {
                            Ok(event) => {
                                if tx.send(ChannelMessage::Event(event)).is_err() {
                                    return;
                                }
                            }
                            Err(e) => tracing::warn!("unparseable push event: {e}"),
                        },
                        Ok(Message::Ping(payload)) => {
                            let _ = ws.send(Message::Pong(payload)).await;
                        }
                        Ok(Message::Close(_)) => break,
                        Ok(_) => {}
                        Err(e) => {
                            tracing::debug!("push channel read error: {e}");
                            break;
                        }
                    }
                }
                tracing::info!("push channel disconnected");
                if tx.send(ChannelMessage::Disconnected).is_err() {
                    return;
                }
            }
            Err(e) => {
                tracing::debug!(%url, "push channel connect failed: {e}");
            }
        }
        tokio::time::sleep(backoff).await;
        backoff = (backoff * 2).min(MAX_BACKOFF);
    }
}
