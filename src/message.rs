//! Relay protocol messages.
//!
//! The bridge speaks the NIP-01 subset it needs:
//! - Client to Relay: REQ
//! - Relay to Client: EVENT, EOSE, NOTICE (everything else is ignored)

use crate::error::{BridgeError, Result};
use crate::event::Event;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Filter for subscription requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Authors (pubkeys)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,

    /// Event kinds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kinds: Option<Vec<u16>>,

    /// Events since timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<u64>,
}

impl Filter {
    /// Create a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by authors.
    pub fn authors(mut self, authors: Vec<String>) -> Self {
        self.authors = Some(authors);
        self
    }

    /// Filter by kinds.
    pub fn kinds(mut self, kinds: Vec<u16>) -> Self {
        self.kinds = Some(kinds);
        self
    }

    /// Filter by events since timestamp.
    pub fn since(mut self, timestamp: u64) -> Self {
        self.since = Some(timestamp);
        self
    }
}

/// Messages sent from client to relay.
#[derive(Debug, Clone)]
pub enum ClientMessage {
    /// Subscribe to events: ["REQ", <subscription_id>, <filter>]
    Req {
        subscription_id: String,
        filter: Filter,
    },
}

impl ClientMessage {
    /// Serialize to JSON array for sending to relay.
    pub fn to_json(&self) -> Result<String> {
        let value = match self {
            ClientMessage::Req {
                subscription_id,
                filter,
            } => Value::Array(vec![
                Value::String("REQ".to_string()),
                Value::String(subscription_id.clone()),
                serde_json::to_value(filter)?,
            ]),
        };
        Ok(value.to_string())
    }
}

/// Messages received from the relay that the bridge acts on.
#[derive(Debug, Clone)]
pub enum RelayMessage {
    /// Event matching a subscription: ["EVENT", <subscription_id>, <event JSON>]
    Event {
        subscription_id: String,
        event: Event,
    },

    /// End of stored events: ["EOSE", <subscription_id>]
    Eose { subscription_id: String },

    /// Human-readable notice: ["NOTICE", <message>]
    Notice { message: String },
}

impl RelayMessage {
    /// Parse a JSON frame from the relay.
    ///
    /// Returns `Ok(None)` for frames the bridge does not act on (unknown or
    /// uninteresting tags). Returns an error only for frames that claim a
    /// known tag but are structurally malformed; callers log and drop those.
    pub fn from_json(json: &str) -> Result<Option<Self>> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| BridgeError::Protocol(format!("invalid JSON frame: {}", e)))?;

        let arr = match value.as_array() {
            Some(a) => a,
            None => return Err(BridgeError::Protocol("frame is not an array".to_string())),
        };

        if arr.is_empty() {
            return Err(BridgeError::Protocol("empty frame".to_string()));
        }

        let tag = match arr[0].as_str() {
            Some(t) => t,
            None => {
                return Err(BridgeError::Protocol(
                    "frame tag is not a string".to_string(),
                ))
            }
        };

        match tag {
            "EVENT" => {
                if arr.len() < 3 {
                    return Err(BridgeError::Protocol(
                        "EVENT frame requires subscription_id and event".to_string(),
                    ));
                }
                let subscription_id = arr[1]
                    .as_str()
                    .ok_or_else(|| {
                        BridgeError::Protocol("EVENT subscription_id must be a string".to_string())
                    })?
                    .to_string();
                let event: Event = serde_json::from_value(arr[2].clone())
                    .map_err(|e| BridgeError::Protocol(format!("invalid event payload: {}", e)))?;
                Ok(Some(RelayMessage::Event {
                    subscription_id,
                    event,
                }))
            }
            "EOSE" => {
                if arr.len() < 2 {
                    return Err(BridgeError::Protocol(
                        "EOSE frame requires subscription_id".to_string(),
                    ));
                }
                let subscription_id = arr[1]
                    .as_str()
                    .ok_or_else(|| {
                        BridgeError::Protocol("EOSE subscription_id must be a string".to_string())
                    })?
                    .to_string();
                Ok(Some(RelayMessage::Eose { subscription_id }))
            }
            "NOTICE" => {
                if arr.len() < 2 {
                    return Err(BridgeError::Protocol(
                        "NOTICE frame requires a message".to_string(),
                    ));
                }
                let message = arr[1].as_str().unwrap_or("").to_string();
                Ok(Some(RelayMessage::Notice { message }))
            }
            // OK, CLOSED, AUTH, COUNT and anything newer: the bridge never
            // publishes or authenticates, so these carry nothing actionable.
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_req_serialization() {
        let msg = ClientMessage::Req {
            subscription_id: "sub1".to_string(),
            filter: Filter::new()
                .kinds(vec![0, 1])
                .authors(vec!["author1".to_string()])
                .since(1000),
        };

        let json = msg.to_json().unwrap();
        assert_eq!(
            json,
            r#"["REQ","sub1",{"authors":["author1"],"kinds":[0,1],"since":1000}]"#
        );
    }

    #[test]
    fn test_filter_skips_unset_fields() {
        let filter = Filter::new().kinds(vec![1]);
        let json = serde_json::to_string(&filter).unwrap();
        assert!(json.contains("\"kinds\":[1]"));
        assert!(!json.contains("authors"));
        assert!(!json.contains("since"));
    }

    #[test]
    fn test_parse_event_frame() {
        let json = r#"["EVENT","sub1",{"id":"abc","pubkey":"pk","created_at":123,"kind":1,"tags":[],"content":"Hello","sig":"sig"}]"#;
        let msg = RelayMessage::from_json(json).unwrap().unwrap();

        match msg {
            RelayMessage::Event {
                subscription_id,
                event,
            } => {
                assert_eq!(subscription_id, "sub1");
                assert_eq!(event.id, "abc");
                assert_eq!(event.content, "Hello");
            }
            _ => panic!("wrong message type"),
        }
    }

    #[test]
    fn test_parse_event_frame_missing_payload() {
        let result = RelayMessage::from_json(r#"["EVENT","sub1"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_event_frame_bad_subscription_id() {
        let result = RelayMessage::from_json(r#"["EVENT",42,{"id":"abc"}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_event_frame_malformed_event() {
        let result = RelayMessage::from_json(r#"["EVENT","sub1",{"id":"abc"}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_eose_frame() {
        let msg = RelayMessage::from_json(r#"["EOSE","sub1"]"#).unwrap().unwrap();
        match msg {
            RelayMessage::Eose { subscription_id } => assert_eq!(subscription_id, "sub1"),
            _ => panic!("wrong message type"),
        }
    }

    #[test]
    fn test_parse_notice_frame() {
        let msg = RelayMessage::from_json(r#"["NOTICE","rate limited"]"#)
            .unwrap()
            .unwrap();
        match msg {
            RelayMessage::Notice { message } => assert_eq!(message, "rate limited"),
            _ => panic!("wrong message type"),
        }
    }

    #[test]
    fn test_unknown_tags_ignored() {
        assert!(RelayMessage::from_json(r#"["OK","event123",true,""]"#)
            .unwrap()
            .is_none());
        assert!(RelayMessage::from_json(r#"["AUTH","challenge"]"#)
            .unwrap()
            .is_none());
        assert!(RelayMessage::from_json(r#"["SOMETHING","else"]"#)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_malformed_frames() {
        assert!(RelayMessage::from_json("not valid json").is_err());
        assert!(RelayMessage::from_json("[]").is_err());
        assert!(RelayMessage::from_json(r#"{"not":"an array"}"#).is_err());
        assert!(RelayMessage::from_json(r#"[42,"tag not a string"]"#).is_err());
    }
}
