//! Messages exchanged between the popup and the content script.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Message delivered to a page's engine.
///
/// Serialized as `{"action": "toggleCensoring", "enabled": true}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum ContentMessage {
    #[serde(rename = "toggleCensoring")]
    ToggleCensoring { enabled: bool },
}

impl ContentMessage {
    pub fn toggle(enabled: bool) -> Self {
        Self::ToggleCensoring { enabled }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Reply sent back once a message has been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub status: String,
}

impl Ack {
    pub fn updated() -> Self {
        Self {
            status: "Censoring state updated".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let json = ContentMessage::toggle(false).to_json().unwrap();
        assert_eq!(json, r#"{"action":"toggleCensoring","enabled":false}"#);
    }

    #[test]
    fn test_parse_from_popup() {
        let msg = ContentMessage::from_json(r#"{"enabled": true, "action": "toggleCensoring"}"#).unwrap();
        assert_eq!(msg, ContentMessage::ToggleCensoring { enabled: true });
    }

    #[test]
    fn test_unknown_action_rejected() {
        assert!(ContentMessage::from_json(r#"{"action": "reload"}"#).is_err());
        assert!(ContentMessage::from_json(r#"{"action": "toggleCensoring"}"#).is_err());
    }

    #[test]
    fn test_ack_shape() {
        let json = serde_json::to_string(&Ack::updated()).unwrap();
        assert_eq!(json, r#"{"status":"Censoring state updated"}"#);
    }
}
