//! Environment configuration.

use anyhow::{anyhow, Context, Result};
use std::env;
use url::Url;

/// Bridge configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Relay WebSocket endpoint (ws:// or wss://)
    pub relay_url: Url,
    /// Sole author pubkey filtered on
    pub pubkey: String,
    /// Event kinds included in the subscription
    pub event_kinds: Vec<u16>,
    /// Webhook destination for outbound notifications
    pub webhook_url: String,
}

impl Config {
    /// Load configuration from the environment (and `.env` if present).
    pub fn load() -> Result<Self> {
        let relay_url = env::var("RELAY_URL")
            .map_err(|_| anyhow!("RELAY_URL not found in environment or .env file"))?;
        let relay_url = parse_relay_url(&relay_url)?;

        let pubkey = env::var("PUBKEY")
            .map_err(|_| anyhow!("PUBKEY not found in environment or .env file"))?;

        let event_kinds = env::var("EVENT_TYPES")
            .map_err(|_| anyhow!("EVENT_TYPES not found in environment or .env file"))?;
        let event_kinds = parse_kinds(&event_kinds)?;

        let webhook_url = env::var("DISCORD_WEBHOOK_URL")
            .map_err(|_| anyhow!("DISCORD_WEBHOOK_URL not found in environment or .env file"))?;

        Ok(Self {
            relay_url,
            pubkey,
            event_kinds,
            webhook_url,
        })
    }
}

/// Parse and validate a relay URL.
pub fn parse_relay_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("invalid RELAY_URL: {}", raw))?;
    if url.scheme() != "ws" && url.scheme() != "wss" {
        return Err(anyhow!(
            "RELAY_URL must use ws:// or wss:// scheme, got: {}",
            url.scheme()
        ));
    }
    Ok(url)
}

/// Parse a comma-separated kind list, e.g. `0,1,3,7`.
pub fn parse_kinds(raw: &str) -> Result<Vec<u16>> {
    let kinds = raw
        .split(',')
        .map(|s| {
            s.trim()
                .parse::<u16>()
                .with_context(|| format!("invalid event kind in EVENT_TYPES: {:?}", s.trim()))
        })
        .collect::<Result<Vec<u16>>>()?;

    if kinds.is_empty() {
        return Err(anyhow!("EVENT_TYPES must contain at least one kind"));
    }
    Ok(kinds)
}
