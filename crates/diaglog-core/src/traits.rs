//! Collaborator seams for persistence, escalation, and self-diagnostics.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::LogEntry;

/// Persistence error.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("persistence error: {0}")]
    Internal(String),
}

/// Trait for snapshot persistence backends.
///
/// The store writes its full buffer after every insertion and hydrates from
/// the stored snapshot at construction. An implementation owns exactly one
/// named slot; `save` replaces the slot's previous contents.
#[async_trait]
pub trait LogPersistence: Send + Sync {
    /// Replace the stored snapshot with the given entries.
    async fn save(&self, entries: &[LogEntry]) -> Result<(), PersistError>;

    /// Load the stored snapshot, or `None` when the slot holds nothing.
    async fn load(&self) -> Result<Option<Vec<LogEntry>>, PersistError>;

    /// Remove the stored snapshot.
    async fn clear(&self) -> Result<(), PersistError>;
}

/// Escalation error.
#[derive(Debug, Error)]
pub enum EscalateError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Trait for forwarding critical events to an external sink.
///
/// The store invokes this fire-and-forget: failures are logged locally and
/// never surface to the code that recorded the entry.
#[async_trait]
pub trait Escalator: Send + Sync {
    /// Forward one event to the sink.
    async fn escalate(&self, message: &str, data: Option<Value>) -> Result<(), EscalateError>;
}

/// Escalator that drops every event.
#[derive(Debug, Default, Clone)]
pub struct NoopEscalator;

#[async_trait]
impl Escalator for NoopEscalator {
    async fn escalate(&self, _message: &str, _data: Option<Value>) -> Result<(), EscalateError> {
        Ok(())
    }
}

/// Fallback channel for the store's own failures.
///
/// When persistence misbehaves the store reports it here instead of failing
/// the caller. Implementations must not call back into the store.
pub trait DiagnosticChannel: Send + Sync {
    /// Report one warning.
    fn warn(&self, message: &str);
}

/// Diagnostic channel writing to standard error.
#[derive(Debug, Default, Clone)]
pub struct StderrChannel;

impl DiagnosticChannel for StderrChannel {
    fn warn(&self, message: &str) {
        eprintln!("diaglog: {message}");
    }
}
