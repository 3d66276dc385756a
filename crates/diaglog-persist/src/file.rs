//! JSON file snapshot persistence.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use diaglog_core::{LogEntry, LogPersistence, PersistError};

/// File-backed persistence: one named slot stored as one JSON file.
///
/// The slot holds the serialized entry array with RFC 3339 timestamps, the
/// same representation `LogStore::export_logs` produces. A missing file is
/// an empty slot, not an error.
pub struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    /// Persist to the given file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Persist to `<slot>.json` inside the given directory.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>, slot: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{slot}.json")),
        }
    }

    /// Persist to `<slot>.json` under the platform data directory for `app`.
    ///
    /// Falls back to the current directory when no data directory is known.
    #[must_use]
    pub fn in_data_dir(app: &str, slot: &str) -> Self {
        let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::in_dir(base.join(app), slot)
    }

    /// Path of the underlying slot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LogPersistence for FilePersistence {
    async fn save(&self, entries: &[LogEntry]) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    async fn load(&self) -> Result<Option<Vec<LogEntry>>, PersistError> {
        let json = match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&json)?))
    }

    async fn clear(&self) -> Result<(), PersistError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use diaglog_core::{LogLevel, SessionContext};

    use super::*;

    fn entries() -> Vec<LogEntry> {
        let context = SessionContext::new();
        vec![
            LogEntry::new(
                LogLevel::Critical,
                "network down",
                Some(serde_json::json!({ "retries": 3 })),
                &context,
            ),
            LogEntry::new(LogLevel::Debug, "probe", None, &context),
        ]
    }

    #[tokio::test]
    async fn test_missing_slot_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = FilePersistence::in_dir(dir.path(), "logs");

        assert!(persistence.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = FilePersistence::in_dir(dir.path(), "logs");
        let saved = entries();

        persistence.save(&saved).await.unwrap();
        let loaded = persistence.load().await.unwrap().unwrap();
        assert_eq!(loaded, saved);
    }

    #[tokio::test]
    async fn test_slot_file_naming() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = FilePersistence::in_dir(dir.path(), "logs");
        assert_eq!(persistence.path(), dir.path().join("logs.json"));

        persistence.save(&entries()).await.unwrap();
        assert!(persistence.path().exists());
    }

    #[tokio::test]
    async fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = FilePersistence::in_dir(dir.path().join("nested/app"), "logs");

        persistence.save(&entries()).await.unwrap();
        assert!(persistence.path().exists());
    }

    #[tokio::test]
    async fn test_clear_removes_slot() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = FilePersistence::in_dir(dir.path(), "logs");

        persistence.save(&entries()).await.unwrap();
        persistence.clear().await.unwrap();

        assert!(!persistence.path().exists());
        assert!(persistence.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_on_missing_slot_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = FilePersistence::in_dir(dir.path(), "logs");

        persistence.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_slot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = FilePersistence::in_dir(dir.path(), "logs");

        tokio::fs::write(persistence.path(), "not json").await.unwrap();
        assert!(matches!(
            persistence.load().await,
            Err(PersistError::Serde(_))
        ));
    }
}
