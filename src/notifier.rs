//! Webhook notification sink.
//!
//! Formats a received event as a Discord embed and POSTs it to the configured
//! webhook URL. Delivery is fire-and-forget: a failed POST is logged and
//! discarded, and because each delivery runs as its own task, notification
//! order is not guaranteed to match event arrival order when several POSTs
//! are in flight at once.

use crate::error::Result;
use crate::event::{kind_color, kind_label, Event};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info};

/// Maximum embed description length before truncation.
const MAX_CONTENT_CHARS: usize = 250;

/// Appended to truncated content, pointing at the full note.
const TRUNCATION_NOTE: &str = "... *(see full note in client links below)*";

/// Footer text on every embed.
const FOOTER_TEXT: &str = "Nostr Event Subscriber";

/// How many leading characters of event ids and pubkeys to show.
const SHORT_HEX_CHARS: usize = 15;

/// Abstraction over the downstream notification sink.
///
/// The relay side only ever calls `notify`; everything about formatting and
/// delivery lives behind this trait, which also gives tests a recording sink.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one event. Must not fail: delivery errors are handled
    /// (logged and dropped) by the implementation.
    async fn notify(&self, event: Event);
}

/// Webhook payload: a single embed per event.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload {
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub footer: EmbedFooter,
    /// ISO-8601 time the notification was built
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

/// Truncate display content to the embed limit.
///
/// Counted in characters, not bytes, so multi-byte content is never split
/// mid-scalar. Content at or under the limit passes through unchanged.
pub fn truncate_content(content: &str) -> String {
    if content.chars().count() <= MAX_CONTENT_CHARS {
        return content.to_string();
    }
    let mut truncated: String = content.chars().take(MAX_CONTENT_CHARS).collect();
    truncated.push_str(TRUNCATION_NOTE);
    truncated
}

/// Render event tags for display: each tag space-joined in backticks, the
/// tags comma-joined, or the literal "None" when the event has no tags.
pub fn render_tags(tags: &[Vec<String>]) -> String {
    if tags.is_empty() {
        return "None".to_string();
    }
    tags.iter()
        .map(|tag| format!("`{}`", tag.join(" ")))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Shorten a hex id or pubkey for inline display.
fn short_hex(hex: &str) -> String {
    let head: String = hex.chars().take(SHORT_HEX_CHARS).collect();
    format!("`{}...`", head)
}

/// Format a unix timestamp for the Created At field.
fn format_created_at(created_at: u64) -> String {
    match DateTime::<Utc>::from_timestamp(created_at as i64, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => created_at.to_string(),
    }
}

/// Build the embed payload for one event. Pure; no I/O.
pub fn build_payload(event: &Event) -> WebhookPayload {
    let primal_link = format!("https://primal.net/e/{}", event.id);
    let nostr_at_link = format!("https://nostr.at/{}", event.id);

    let embed = Embed {
        title: format!(
            "📣 New Nostr Event: {} (Kind: {})",
            kind_label(event.kind),
            event.kind
        ),
        description: truncate_content(&event.content),
        color: kind_color(event.kind),
        fields: vec![
            EmbedField {
                name: "🆔 Event ID".to_string(),
                value: short_hex(&event.id),
                inline: true,
            },
            EmbedField {
                name: "👤 Author".to_string(),
                value: short_hex(&event.pubkey),
                inline: true,
            },
            EmbedField {
                name: "🕰️ Created At".to_string(),
                value: format_created_at(event.created_at),
                inline: true,
            },
            EmbedField {
                name: "🏷️ Tags".to_string(),
                value: render_tags(&event.tags),
                inline: false,
            },
            EmbedField {
                name: "🔗 View in Nostr Clients".to_string(),
                value: format!("[Primal]({}) | [nostr.at]({})", primal_link, nostr_at_link),
                inline: false,
            },
        ],
        footer: EmbedFooter {
            text: FOOTER_TEXT.to_string(),
        },
        timestamp: Utc::now().to_rfc3339(),
    };

    WebhookPayload {
        embeds: vec![embed],
    }
}

/// Discord webhook sink.
pub struct DiscordNotifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl DiscordNotifier {
    /// Create a notifier posting to the given webhook URL.
    pub fn new(webhook_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            webhook_url: webhook_url.into(),
        })
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn notify(&self, event: Event) {
        let payload = build_payload(&event);

        match self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                info!(event_id = %event.id, "event sent to webhook");
            }
            Ok(response) => {
                error!(
                    event_id = %event.id,
                    status = %response.status(),
                    "webhook rejected notification"
                );
            }
            Err(e) => {
                error!(event_id = %event.id, "error sending to webhook: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> Event {
        Event {
            id: "a".repeat(64),
            pubkey: "b".repeat(64),
            created_at: 1700000000,
            kind: 1,
            tags: vec![],
            content: "Hello Nostr".to_string(),
            sig: None,
        }
    }

    #[test]
    fn test_truncate_short_content_unchanged() {
        let content = "x".repeat(250);
        assert_eq!(truncate_content(&content), content);
        assert_eq!(truncate_content(""), "");
    }

    #[test]
    fn test_truncate_long_content() {
        let content = "x".repeat(251);
        let truncated = truncate_content(&content);
        assert_eq!(
            truncated,
            format!("{}{}", "x".repeat(250), TRUNCATION_NOTE)
        );
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        // 251 three-byte characters must truncate to exactly 250 characters.
        let content = "あ".repeat(251);
        let truncated = truncate_content(&content);
        assert!(truncated.starts_with(&"あ".repeat(250)));
        assert!(truncated.ends_with(TRUNCATION_NOTE));
        assert_eq!(
            truncated.chars().count(),
            250 + TRUNCATION_NOTE.chars().count()
        );
    }

    #[test]
    fn test_render_tags_empty() {
        assert_eq!(render_tags(&[]), "None");
    }

    #[test]
    fn test_render_tags_joined() {
        let tags = vec![
            vec!["e".to_string(), "abc".to_string()],
            vec!["p".to_string(), "def".to_string()],
        ];
        assert_eq!(render_tags(&tags), "`e abc`, `p def`");
    }

    #[test]
    fn test_short_hex() {
        assert_eq!(short_hex(&"a".repeat(64)), format!("`{}...`", "a".repeat(15)));
        // Shorter than the cut-off still renders without panicking.
        assert_eq!(short_hex("abc"), "`abc...`");
    }

    #[test]
    fn test_format_created_at() {
        assert_eq!(format_created_at(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(format_created_at(1700000000), "2023-11-14 22:13:20 UTC");
    }

    #[test]
    fn test_build_payload_shape() {
        let mut event = sample_event();
        event.tags = vec![vec!["t".to_string(), "news".to_string()]];
        let payload = build_payload(&event);

        assert_eq!(payload.embeds.len(), 1);
        let embed = &payload.embeds[0];
        assert_eq!(embed.title, "📣 New Nostr Event: Text Note (Kind: 1)");
        assert_eq!(embed.description, "Hello Nostr");
        assert_eq!(embed.color, 3447003);
        assert_eq!(embed.footer.text, FOOTER_TEXT);
        assert_eq!(embed.fields.len(), 5);

        assert_eq!(embed.fields[0].name, "🆔 Event ID");
        assert!(embed.fields[0].inline);
        assert_eq!(embed.fields[3].value, "`t news`");
        assert!(!embed.fields[3].inline);
        assert!(embed.fields[4]
            .value
            .contains(&format!("https://primal.net/e/{}", event.id)));
        assert!(embed.fields[4]
            .value
            .contains(&format!("https://nostr.at/{}", event.id)));
    }

    #[test]
    fn test_build_payload_unknown_kind() {
        let mut event = sample_event();
        event.kind = 42;
        let payload = build_payload(&event);
        let embed = &payload.embeds[0];
        assert_eq!(embed.title, "📣 New Nostr Event: Unknown (Kind: 42)");
        assert_eq!(embed.color, 7506394);
    }
}
