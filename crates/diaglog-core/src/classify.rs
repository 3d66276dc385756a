//! Failure classification and user-facing messages.
//!
//! The tagged [`Fault`] kind is the source of truth for severity and
//! display text. The substring rules exist only as an adapter for foreign
//! errors that arrive as opaque message strings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::LogLevel;

/// Category of a reported failure.
///
/// Owns both the severity mapping and the user-facing text, so the two can
/// never drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Connectivity failure. Escalated remotely.
    Network,
    /// Authentication or authorization failure.
    Auth,
    /// Rejected user input.
    Validation,
    /// Anything else.
    Unknown,
}

impl ErrorCategory {
    /// Classify an opaque error message.
    ///
    /// Case-insensitive substring match against an ordered rule list; the
    /// first matching rule wins.
    #[must_use]
    pub fn from_message(message: &str) -> Self {
        const RULES: [(ErrorCategory, &[&str]); 3] = [
            (ErrorCategory::Network, &["network", "connection", "timeout"]),
            (ErrorCategory::Auth, &["auth", "permission", "unauthorized"]),
            (ErrorCategory::Validation, &["validation", "invalid"]),
        ];

        let lowered = message.to_lowercase();
        for (category, markers) in RULES {
            if markers.iter().any(|m| lowered.contains(m)) {
                return category;
            }
        }
        Self::Unknown
    }

    /// Severity at which failures of this category are recorded.
    #[must_use]
    pub const fn level(self) -> LogLevel {
        match self {
            Self::Network => LogLevel::Critical,
            Self::Auth | Self::Unknown => LogLevel::Error,
            Self::Validation => LogLevel::Warn,
        }
    }

    /// Friendly text shown to the user when a failure of this category is
    /// reported.
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::Network => "Connection problem. Please check your network and try again.",
            Self::Auth => "You don't have permission to do that. Please sign in again.",
            Self::Validation => "Some of the entered information is invalid. Please review it.",
            Self::Unknown => "Something went wrong. Please try again.",
        }
    }
}

/// Application failure carrying its category explicitly.
///
/// Prefer constructing the right variant at the failure site; use
/// [`Fault::from_message`] only for errors whose origin is opaque.
#[derive(Debug, Error)]
pub enum Fault {
    #[error("network failure: {0}")]
    Network(String),
    #[error("authorization failure: {0}")]
    Auth(String),
    #[error("validation failure: {0}")]
    Validation(String),
    #[error("{0}")]
    Other(String),
}

impl Fault {
    /// Wrap an opaque error message, classifying it by the substring rules.
    #[must_use]
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        match ErrorCategory::from_message(&message) {
            ErrorCategory::Network => Self::Network(message),
            ErrorCategory::Auth => Self::Auth(message),
            ErrorCategory::Validation => Self::Validation(message),
            ErrorCategory::Unknown => Self::Other(message),
        }
    }

    /// The category this fault belongs to.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Network(_) => ErrorCategory::Network,
            Self::Auth(_) => ErrorCategory::Auth,
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Other(_) => ErrorCategory::Unknown,
        }
    }

    /// Friendly text to show the user for this fault.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        self.category().user_message()
    }
}
