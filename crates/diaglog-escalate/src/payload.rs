//! Wire representation of escalated events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One escalated event, as posted to the remote sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationPayload {
    /// Human-readable description of the failure.
    pub message: String,
    /// Structured payload recorded with the entry, preserved verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Session that reported the failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    /// Time the event was escalated.
    pub timestamp: DateTime<Utc>,
}

impl EscalationPayload {
    /// Build a payload stamped with the current time.
    #[must_use]
    pub fn new(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            message: message.into(),
            data,
            session_id: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach the reporting session's id.
    #[must_use]
    pub fn with_session(mut self, session_id: Uuid) -> Self {
        self.session_id = Some(session_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_roundtrip() {
        let payload = EscalationPayload::new(
            "network down",
            Some(serde_json::json!({ "retries": 3 })),
        )
        .with_session(Uuid::new_v4());

        let json = serde_json::to_string(&payload).unwrap();
        let parsed: EscalationPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, payload);
    }

    #[test]
    fn test_payload_omits_absent_fields() {
        let payload = EscalationPayload::new("boom", None);

        let json = serde_json::to_string(&payload).unwrap();
        assert!(!json.contains("data"));
        assert!(!json.contains("session_id"));
        assert!(json.contains("\"message\":\"boom\""));
    }
}
