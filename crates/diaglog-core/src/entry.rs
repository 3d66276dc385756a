//! Log entries and severity levels.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::SessionContext;

/// Severity of a log entry, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Developer-facing detail.
    Debug,
    /// Informational event.
    Info,
    /// Recoverable issue, typically bad user input.
    Warn,
    /// Failed operation needing user notice.
    Error,
    /// System-level failure; recorded locally and escalated remotely.
    Critical,
}

impl LogLevel {
    /// All levels, in ascending severity order.
    pub const ALL: [Self; 5] = [
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Critical,
    ];

    /// Name used in serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown level name.
#[derive(Debug, Error)]
#[error("unknown log level: {0}")]
pub struct ParseLevelError(String);

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "critical" => Ok(Self::Critical),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// One immutable diagnostic event.
///
/// Entries are constructed by the store at record time and never mutated
/// afterwards. Timestamps serialize as RFC 3339 strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// Severity.
    pub level: LogLevel,
    /// Free-form text.
    pub message: String,
    /// Opaque structured payload, preserved verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// User identity at record time, if one was set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Identity of the recording process instance.
    pub session_id: Uuid,
    /// Location the client was at when the entry was recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Client environment description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl LogEntry {
    /// Build an entry stamped with the current time and the session context.
    #[must_use]
    pub fn new(
        level: LogLevel,
        message: impl Into<String>,
        data: Option<Value>,
        context: &SessionContext,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            data,
            user_id: context.user_id.clone(),
            session_id: context.session_id,
            url: context.url.clone(),
            user_agent: context.user_agent.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Critical);
    }

    #[test]
    fn test_level_serialization() {
        let json = serde_json::to_string(&LogLevel::Critical).unwrap();
        assert_eq!(json, "\"critical\"");

        let parsed: LogLevel = serde_json::from_str("\"warn\"").unwrap();
        assert_eq!(parsed, LogLevel::Warn);
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("ERROR".parse::<LogLevel>().unwrap(), LogLevel::Error);
        assert_eq!("info".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert!("fatal".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_entry_copies_context() {
        let mut context = SessionContext::new();
        context.set_user_id("u1");

        let entry = LogEntry::new(LogLevel::Info, "hello", None, &context);
        assert_eq!(entry.session_id, context.session_id);
        assert_eq!(entry.user_id.as_deref(), Some("u1"));
        assert_eq!(entry.message, "hello");
    }

    #[test]
    fn test_entry_omits_absent_optionals() {
        let context = SessionContext::new();
        let entry = LogEntry::new(LogLevel::Debug, "probe", None, &context);

        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("user_id"));
        assert!(!json.contains("url"));
        assert!(!json.contains("user_agent"));
        assert!(json.contains("\"level\":\"debug\""));
    }

    #[test]
    fn test_entry_roundtrip() {
        let context = SessionContext::new();
        let entry = LogEntry::new(
            LogLevel::Error,
            "save failed",
            Some(serde_json::json!({ "attempt": 2 })),
            &context,
        );

        let json = serde_json::to_string(&entry).unwrap();
        let parsed: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entry);
    }
}
