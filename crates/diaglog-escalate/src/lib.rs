//! Escalation transport for the diagnostic log store.
//!
//! Provides:
//! - Wire payload type (JSON)
//! - HTTP escalator (feature: http)

pub mod payload;

#[cfg(feature = "http")]
pub mod http;

pub use payload::EscalationPayload;

#[cfg(feature = "http")]
pub use http::HttpEscalator;
