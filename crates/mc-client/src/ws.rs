//! The single `/ws` subscription and its reconnect loop.
//!
//! The socket is receive-only: frames are `{type, data}` JSON decoded into
//! [`WsEvent`] and fanned into a flume channel. On close or connect failure
//! the loop sleeps a fixed delay and tries again, indefinitely; it only exits
//! when every receiver of the channel has been dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use mc_api_types::WsEvent;

pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct WsOptions {
    /// Fixed delay between reconnect attempts. Not a backoff.
    pub reconnect_delay: Duration,
}

impl Default for WsOptions {
    fn default() -> Self {
        Self {
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}

/// Run the listener until the channel has no receivers left. `connected`
/// tracks the live-socket state for the UI; there is exactly one of these
/// loops per store, so there is never more than one pending reconnect.
pub async fn run_listener(
    url: String,
    opts: WsOptions,
    tx: flume::Sender<WsEvent>,
    connected: Arc<AtomicBool>,
) {
    loop {
        let mut stream = match connect_async(&url).await {
            Ok((stream, _resp)) => stream,
            Err(err) => {
                warn!(%url, %err, "websocket connect failed");
                if tx.is_disconnected() {
                    return;
                }
                tokio::time::sleep(opts.reconnect_delay).await;
                continue;
            }
        };

        connected.store(true, Ordering::SeqCst);
        debug!(%url, "websocket connected");

        while let Some(frame) = stream.next().await {
            match frame {
                Ok(Message::Text(text)) => match serde_json::from_str::<WsEvent>(text.as_str()) {
                    Ok(event) => {
                        if tx.send(event).is_err() {
                            connected.store(false, Ordering::SeqCst);
                            return;
                        }
                    }
                    Err(err) => {
                        debug!(%err, raw = text.as_str(), "ignoring unrecognised ws frame");
                    }
                },
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(err) => {
                    warn!(%err, "websocket read error");
                    break;
                }
            }
        }

        connected.store(false, Ordering::SeqCst);
        debug!(%url, "websocket disconnected");

        if tx.is_disconnected() {
            return;
        }
        tokio::time::sleep(opts.reconnect_delay).await;
    }
}
