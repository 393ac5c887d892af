//! Nostr event record and kind presentation tables.

use serde::{Deserialize, Serialize};

/// A Nostr event as delivered by the relay.
///
/// The bridge never verifies signatures, so `sig` is carried only when the
/// relay provides it. `tags` defaults to empty when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// 32-bytes lowercase hex-encoded sha256 of the serialized event data
    pub id: String,
    /// 32-bytes lowercase hex-encoded public key of the event creator
    pub pubkey: String,
    /// Unix timestamp in seconds
    pub created_at: u64,
    /// Event kind (integer between 0 and 65535)
    pub kind: u16,
    /// Array of arrays of strings (tags)
    #[serde(default)]
    pub tags: Vec<Vec<String>>,
    /// Arbitrary string content
    pub content: String,
    /// 64-bytes lowercase hex signature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sig: Option<String>,
}

/// Human-readable label for an event kind.
pub fn kind_label(kind: u16) -> &'static str {
    match kind {
        0 => "Metadata",
        1 => "Text Note",
        3 => "Contacts",
        7 => "Reaction",
        _ => "Unknown",
    }
}

/// Embed color for an event kind.
pub fn kind_color(kind: u16) -> u32 {
    match kind {
        0 => 16776960,  // Yellow for metadata
        1 => 3447003,   // Blue for text notes
        3 => 10181046,  // Purple for contact lists
        7 => 15105570,  // Orange for reactions
        _ => 7506394,   // Gray fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(kind_label(0), "Metadata");
        assert_eq!(kind_label(1), "Text Note");
        assert_eq!(kind_label(3), "Contacts");
        assert_eq!(kind_label(7), "Reaction");
        assert_eq!(kind_label(2), "Unknown");
        assert_eq!(kind_label(30023), "Unknown");
    }

    #[test]
    fn test_kind_colors() {
        assert_eq!(kind_color(0), 16776960);
        assert_eq!(kind_color(1), 3447003);
        assert_eq!(kind_color(3), 10181046);
        assert_eq!(kind_color(7), 15105570);
        assert_eq!(kind_color(2), 7506394);
        assert_eq!(kind_color(9999), 7506394);
    }

    #[test]
    fn test_event_deserialization() {
        let json = r#"{"id":"abc","pubkey":"pk","created_at":123,"kind":1,"tags":[["e","ref"]],"content":"Hello","sig":"sig"}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.id, "abc");
        assert_eq!(event.kind, 1);
        assert_eq!(event.tags, vec![vec!["e".to_string(), "ref".to_string()]]);
        assert_eq!(event.sig.as_deref(), Some("sig"));
    }

    #[test]
    fn test_event_tags_default_to_empty() {
        let json = r#"{"id":"abc","pubkey":"pk","created_at":123,"kind":1,"content":"Hello"}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert!(event.tags.is_empty());
        assert!(event.sig.is_none());
    }

    #[test]
    fn test_event_missing_required_field() {
        let json = r#"{"id":"abc","pubkey":"pk","created_at":123,"kind":1}"#;
        let result = serde_json::from_str::<Event>(json);
        assert!(result.is_err());
    }
}
