//! In-memory snapshot persistence.

use std::sync::RwLock;

use async_trait::async_trait;
use diaglog_core::{LogEntry, LogPersistence, PersistError};

/// In-memory persistence implementation.
///
/// Useful for development and tests. Data is lost on drop.
#[derive(Default)]
pub struct MemoryPersistence {
    slot: RwLock<Option<Vec<LogEntry>>>,
}

impl MemoryPersistence {
    /// Create a new empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LogPersistence for MemoryPersistence {
    async fn save(&self, entries: &[LogEntry]) -> Result<(), PersistError> {
        *self
            .slot
            .write()
            .map_err(|e| PersistError::Internal(e.to_string()))? = Some(entries.to_vec());
        Ok(())
    }

    async fn load(&self) -> Result<Option<Vec<LogEntry>>, PersistError> {
        Ok(self
            .slot
            .read()
            .map_err(|e| PersistError::Internal(e.to_string()))?
            .clone())
    }

    async fn clear(&self) -> Result<(), PersistError> {
        *self
            .slot
            .write()
            .map_err(|e| PersistError::Internal(e.to_string()))? = None;
        Ok(())
    }
}
