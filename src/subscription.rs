//! Subscription identifiers and live filters.

use crate::message::Filter;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Generate a unique subscription ID.
///
/// A fresh id per connection attempt keeps relay-side subscription state from
/// a previous connection from colliding with the new one.
pub fn generate_subscription_id() -> String {
    Uuid::new_v4().to_string()[..8].to_string()
}

/// Current unix time in seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Build the subscription filter for a fresh connection.
///
/// `since` is pinned to the moment of the call, so a reconnect never replays
/// events the bridge already forwarded before the connection dropped.
pub fn live_filter(author: &str, kinds: &[u16]) -> Filter {
    Filter::new()
        .authors(vec![author.to_string()])
        .kinds(kinds.to_vec())
        .since(unix_now())
}
