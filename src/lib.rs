//! Nostr relay to Discord webhook bridge.
//!
//! This crate provides:
//! - A persistent WebSocket subscription to a single Nostr relay
//! - Defensive parsing of the NIP-01 relay protocol subset it consumes
//! - Unconditional fixed-delay reconnection with a fresh `since` per attempt
//! - Embed formatting and fire-and-forget webhook delivery
//!
//! # Example
//!
//! ```rust,no_run
//! use nostr_bridge::{DiscordNotifier, RelayBridge};
//! use std::sync::Arc;
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() {
//!     let notifier = DiscordNotifier::new("https://discord.com/api/webhooks/...").unwrap();
//!     let mut bridge = RelayBridge::new(
//!         Url::parse("wss://relay.damus.io").unwrap(),
//!         "author-pubkey".to_string(),
//!         vec![0, 1, 3, 7],
//!         Arc::new(notifier),
//!     );
//!     bridge.run().await;
//! }
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod message;
pub mod notifier;
pub mod relay;
pub mod subscription;

// Re-export main types
pub use config::Config;
pub use error::{BridgeError, Result};
pub use event::{kind_color, kind_label, Event};
pub use message::{ClientMessage, Filter, RelayMessage};
pub use notifier::{build_payload, DiscordNotifier, Notifier, WebhookPayload};
pub use relay::{BridgeConfig, ConnectionState, RelayBridge};
pub use subscription::{generate_subscription_id, live_filter, unix_now};
