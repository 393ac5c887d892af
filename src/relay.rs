//! Relay connection management.
//!
//! One task owns the connection lifecycle: connect, subscribe, read frames,
//! and on close or error wait out a fixed delay before reconnecting. The
//! reconnect is an explicit loop rather than a rescheduled callback, so only
//! one retry can ever be pending and the stack does not grow across cycles.

use crate::error::{BridgeError, Result};
use crate::event::kind_label;
use crate::message::{ClientMessage, RelayMessage};
use crate::notifier::Notifier;
use crate::subscription::{generate_subscription_id, live_filter};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use url::Url;

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No live socket
    Disconnected,
    /// Socket opening, subscription not yet issued
    Connecting,
    /// Subscription issued, receiving frames
    Subscribed,
}

/// Relay connection configuration
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Fixed delay between a close and the next connection attempt.
    /// No backoff and no retry cap: the bridge is a long-running background
    /// service that should ride out relay unavailability indefinitely.
    pub reconnect_delay: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            reconnect_delay: Duration::from_secs(5),
        }
    }
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Bridge between one relay subscription and one notification sink.
pub struct RelayBridge<N> {
    /// Relay URL
    url: Url,
    /// Sole author filtered on
    author: String,
    /// Event kinds filtered on
    kinds: Vec<u16>,
    /// Configuration
    config: BridgeConfig,
    /// Downstream sink; deliveries are spawned fire-and-forget
    notifier: Arc<N>,
    /// Connection state
    state: ConnectionState,
}

impl<N: Notifier + 'static> RelayBridge<N> {
    /// Create a bridge with the default connection config.
    pub fn new(url: Url, author: impl Into<String>, kinds: Vec<u16>, notifier: Arc<N>) -> Self {
        Self::with_config(url, author, kinds, notifier, BridgeConfig::default())
    }

    /// Create a bridge with a custom connection config.
    pub fn with_config(
        url: Url,
        author: impl Into<String>,
        kinds: Vec<u16>,
        notifier: Arc<N>,
        config: BridgeConfig,
    ) -> Self {
        Self {
            url,
            author: author.into(),
            kinds,
            config,
            notifier,
            state: ConnectionState::Disconnected,
        }
    }

    /// Get current connection state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Run the connection loop until the process is terminated.
    ///
    /// Every iteration opens a fresh socket, issues a new subscription with
    /// `since` pinned to the current time, and drains frames until the
    /// connection drops. Transport errors and clean closes land in the same
    /// place: the single sleep at the bottom of the loop.
    pub async fn run(&mut self) {
        loop {
            match self.connect_and_subscribe().await {
                Ok(ws) => self.read_frames(ws).await,
                Err(e) => warn!("connection attempt failed: {}", e),
            }

            self.state = ConnectionState::Disconnected;
            info!("reconnecting in {:?}", self.config.reconnect_delay);
            tokio::time::sleep(self.config.reconnect_delay).await;
        }
    }

    /// Open the socket and issue the subscription request.
    async fn connect_and_subscribe(&mut self) -> Result<WsStream> {
        self.state = ConnectionState::Connecting;
        info!("connecting to relay: {}", self.url);

        let mut ws = match timeout(
            self.config.connect_timeout,
            connect_async(self.url.as_str()),
        )
        .await
        {
            Ok(Ok((stream, _))) => stream,
            Ok(Err(e)) => {
                self.state = ConnectionState::Disconnected;
                return Err(BridgeError::WebSocket(e.to_string()));
            }
            Err(_) => {
                self.state = ConnectionState::Disconnected;
                return Err(BridgeError::Timeout(format!(
                    "connection timeout after {:?}",
                    self.config.connect_timeout
                )));
            }
        };

        // Fresh id and fresh `since` per attempt; see subscription.rs.
        let subscription_id = generate_subscription_id();
        let filter = live_filter(&self.author, &self.kinds);
        let since = filter.since.unwrap_or(0);
        let req = ClientMessage::Req {
            subscription_id: subscription_id.clone(),
            filter,
        };

        if let Err(e) = ws.send(Message::text(req.to_json()?)).await {
            self.state = ConnectionState::Disconnected;
            return Err(BridgeError::WebSocket(e.to_string()));
        }

        self.state = ConnectionState::Subscribed;
        info!(
            %subscription_id,
            since,
            kinds = ?self.kinds,
            "subscribed to live events"
        );
        Ok(ws)
    }

    /// Drain frames until the connection ends, however it ends.
    async fn read_frames(&mut self, mut ws: WsStream) {
        while let Some(frame) = ws.next().await {
            match frame {
                Ok(Message::Text(text)) => self.handle_frame(text.as_str()),
                Ok(Message::Ping(data)) => {
                    if let Err(e) = ws.send(Message::Pong(data)).await {
                        warn!("failed to answer ping: {}", e);
                        break;
                    }
                }
                Ok(Message::Close(_)) => {
                    info!("relay closed connection");
                    break;
                }
                Ok(_) => {} // Ignore binary and pong frames
                Err(e) => {
                    // The error ends the stream here, so it shares the
                    // close path: exactly one reconnect gets scheduled.
                    warn!("WebSocket error: {}", e);
                    break;
                }
            }
        }
    }

    /// Parse one inbound frame and dispatch matching events to the notifier.
    ///
    /// Parse failures are logged and dropped; nothing here can take the
    /// process down.
    fn handle_frame(&self, text: &str) {
        match RelayMessage::from_json(text) {
            Ok(Some(RelayMessage::Event {
                subscription_id,
                event,
            })) => {
                info!(
                    %subscription_id,
                    kind = event.kind,
                    "received {} event",
                    kind_label(event.kind)
                );
                let notifier = Arc::clone(&self.notifier);
                tokio::spawn(async move {
                    notifier.notify(event).await;
                });
            }
            Ok(Some(RelayMessage::Eose { subscription_id })) => {
                debug!(%subscription_id, "end of stored events");
            }
            Ok(Some(RelayMessage::Notice { message })) => {
                warn!("notice from relay: {}", message);
            }
            Ok(None) => {
                debug!("ignoring frame: {}", text);
            }
            Err(e) => {
                warn!("error parsing frame: {}", e);
            }
        }
    }
}
