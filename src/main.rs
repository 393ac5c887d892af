//! nostr-bridge binary entrypoint.
//!
//! Loads configuration from the environment, starts the liveness heartbeat,
//! and hands the current task to the relay connection loop. The loop never
//! returns; external termination is the only exit.

use anyhow::Result;
use nostr_bridge::{Config, DiscordNotifier, RelayBridge};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Liveness log interval, independent of event traffic.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::load()?;
    info!(
        relay = %config.relay_url,
        kinds = ?config.event_kinds,
        "starting nostr-bridge"
    );

    let notifier = Arc::new(DiscordNotifier::new(&config.webhook_url)?);

    tokio::spawn(heartbeat());

    let mut bridge = RelayBridge::new(
        config.relay_url,
        config.pubkey,
        config.event_kinds,
        notifier,
    );
    bridge.run().await;

    Ok(())
}

async fn heartbeat() {
    loop {
        tokio::time::sleep(HEARTBEAT_INTERVAL).await;
        info!("still running");
    }
}
