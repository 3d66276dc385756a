//! Bounded most-recent-first log store with live tail support.

use std::{
    collections::{BTreeMap, VecDeque},
    future::Future,
    sync::{Arc, RwLock},
    time::Instant,
};

use chrono::{DateTime, Utc};
use futures::StreamExt;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::{
    LogEntry, LogLevel, SessionContext,
    classify::Fault,
    traits::{DiagnosticChannel, Escalator, LogPersistence, StderrChannel},
};

/// Default number of retained entries.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Aggregate counts over the current buffer contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogStats {
    /// Number of retained entries.
    pub total: usize,
    /// Entry count per level. Sums to `total`.
    pub by_level: BTreeMap<LogLevel, usize>,
}

struct Inner {
    entries: VecDeque<LogEntry>,
    context: SessionContext,
}

/// Bounded in-memory log store.
///
/// Entries are kept most-recent-first; insertion beyond capacity evicts the
/// oldest entry regardless of level. Recording never fails: persistence is
/// best-effort (failures go to the diagnostic channel) and escalation of
/// critical entries is fire-and-forget.
///
/// All methods take `&self`, so the store can be shared as `Arc<LogStore>`.
pub struct LogStore {
    inner: RwLock<Inner>,
    capacity: usize,
    persistence: Option<Arc<dyn LogPersistence>>,
    escalator: Option<Arc<dyn Escalator>>,
    diagnostics: Arc<dyn DiagnosticChannel>,
    sender: broadcast::Sender<LogEntry>,
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LogStore {
    /// Create a store with default capacity and no persistence or escalation.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1024);
        Self {
            inner: RwLock::new(Inner {
                entries: VecDeque::with_capacity(32),
                context: SessionContext::new(),
            }),
            capacity: DEFAULT_CAPACITY,
            persistence: None,
            escalator: None,
            diagnostics: Arc::new(StderrChannel),
            sender,
        }
    }

    /// Start building a store with injected collaborators.
    #[must_use]
    pub fn builder() -> LogStoreBuilder {
        LogStoreBuilder::new()
    }

    /// Identity of this store's session.
    #[must_use]
    pub fn session_id(&self) -> uuid::Uuid {
        self.inner.read().unwrap().context.session_id
    }

    /// Set the user id applied to subsequently recorded entries.
    ///
    /// Already-recorded entries keep whatever user id they were stamped with.
    pub fn set_user_id(&self, id: impl Into<String>) {
        self.inner.write().unwrap().context.set_user_id(id);
    }

    /// Record an entry.
    ///
    /// Never fails. The entry is stamped with the current time and session
    /// context, inserted at the front of the buffer, broadcast to live
    /// subscribers, and the full buffer is persisted best-effort. A
    /// [`LogLevel::Critical`] entry is additionally handed to the escalator
    /// on a detached task.
    pub async fn record(&self, level: LogLevel, message: impl Into<String>, data: Option<Value>) {
        let entry = {
            let mut inner = self.inner.write().unwrap();
            let entry = LogEntry::new(level, message, data, &inner.context);
            inner.entries.push_front(entry.clone());
            while inner.entries.len() > self.capacity {
                inner.entries.pop_back();
            }
            entry
        };

        let _ = self.sender.send(entry.clone()); // live listeners

        self.persist().await;

        if entry.level == LogLevel::Critical {
            self.spawn_escalation(entry.message, entry.data);
        }
    }

    /// Record a debug entry.
    pub async fn debug(&self, message: impl Into<String>) {
        self.record(LogLevel::Debug, message, None).await;
    }

    /// Record an info entry.
    pub async fn info(&self, message: impl Into<String>) {
        self.record(LogLevel::Info, message, None).await;
    }

    /// Record a warn entry.
    pub async fn warn(&self, message: impl Into<String>) {
        self.record(LogLevel::Warn, message, None).await;
    }

    /// Record an error entry.
    pub async fn error(&self, message: impl Into<String>) {
        self.record(LogLevel::Error, message, None).await;
    }

    /// Record a critical entry. Triggers escalation.
    pub async fn critical(&self, message: impl Into<String>) {
        self.record(LogLevel::Critical, message, None).await;
    }

    /// Record a classified fault at its category's severity and return the
    /// user-facing text for it.
    ///
    /// Network faults are critical and therefore escalate.
    pub async fn record_fault(&self, fault: &Fault) -> &'static str {
        let category = fault.category();
        self.record(category.level(), fault.to_string(), None).await;
        category.user_message()
    }

    /// Snapshot of the buffer, most-recent-first, optionally filtered to a
    /// single level.
    #[must_use]
    pub fn get_logs(&self, level: Option<LogLevel>) -> Vec<LogEntry> {
        self.inner
            .read()
            .unwrap()
            .entries
            .iter()
            .filter(|e| level.is_none_or(|l| e.level == l))
            .cloned()
            .collect()
    }

    /// Entries with `start <= timestamp <= end`, inclusive on both ends.
    #[must_use]
    pub fn logs_by_time_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<LogEntry> {
        self.inner
            .read()
            .unwrap()
            .entries
            .iter()
            .filter(|e| e.timestamp >= start && e.timestamp <= end)
            .cloned()
            .collect()
    }

    /// Entries recorded while the given user id was set.
    #[must_use]
    pub fn logs_by_user(&self, user_id: &str) -> Vec<LogEntry> {
        self.inner
            .read()
            .unwrap()
            .entries
            .iter()
            .filter(|e| e.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect()
    }

    /// Empty the buffer and remove the persisted snapshot.
    pub async fn clear_logs(&self) {
        self.inner.write().unwrap().entries.clear();

        if let Some(persistence) = &self.persistence {
            if let Err(e) = persistence.clear().await {
                self.diagnostics
                    .warn(&format!("failed to clear persisted logs: {e}"));
            }
        }
    }

    /// Serialize the full buffer to pretty-printed JSON.
    ///
    /// The representation matches the persisted snapshot and can be parsed
    /// back into entries.
    ///
    /// # Errors
    /// Returns error if an entry's payload cannot be serialized.
    pub fn export_logs(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.get_logs(None))
    }

    /// Aggregate counts over the current buffer.
    #[must_use]
    pub fn stats(&self) -> LogStats {
        let inner = self.inner.read().unwrap();
        let mut by_level = BTreeMap::new();
        for entry in &inner.entries {
            *by_level.entry(entry.level).or_insert(0) += 1;
        }
        LogStats {
            total: inner.entries.len(),
            by_level,
        }
    }

    /// Run `op`, recording its wall-clock duration.
    ///
    /// Success records an info entry with the duration; failure records an
    /// error entry with the duration and the rendered error, then returns
    /// the original error unchanged.
    pub async fn time_operation<F, T, E>(&self, name: &str, op: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let started = Instant::now();
        let result = op.await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => {
                self.record(
                    LogLevel::Info,
                    format!("{name} completed"),
                    Some(serde_json::json!({ "duration_ms": duration_ms })),
                )
                .await;
            }
            Err(e) => {
                self.record(
                    LogLevel::Error,
                    format!("{name} failed: {e}"),
                    Some(serde_json::json!({ "duration_ms": duration_ms })),
                )
                .await;
            }
        }

        result
    }

    /// Closure variant of [`Self::time_operation`] for synchronous work.
    pub async fn time_closure<F, T, E>(&self, name: &str, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: std::fmt::Display,
    {
        self.time_operation(name, async { op() }).await
    }

    /// Receiver for entries recorded after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.sender.subscribe()
    }

    /// Stream that yields the current buffer first, then live entries.
    #[must_use]
    pub fn history_plus_stream(&self) -> futures::stream::BoxStream<'static, LogEntry> {
        let (history, rx) = (self.get_logs(None), self.subscribe());

        let hist = futures::stream::iter(history);
        let live = BroadcastStream::new(rx).filter_map(|res| async move { res.ok() });

        Box::pin(hist.chain(live))
    }

    async fn persist(&self) {
        let Some(persistence) = &self.persistence else {
            return;
        };
        let snapshot = self.get_logs(None);
        if let Err(e) = persistence.save(&snapshot).await {
            self.diagnostics
                .warn(&format!("failed to persist logs: {e}"));
        }
    }

    fn spawn_escalation(&self, message: String, data: Option<Value>) {
        let Some(escalator) = &self.escalator else {
            return;
        };
        let escalator = Arc::clone(escalator);
        tokio::spawn(async move {
            if let Err(e) = escalator.escalate(&message, data).await {
                tracing::warn!("escalation failed: {e}");
            }
        });
    }
}

/// Builder for [`LogStore`].
///
/// Collaborators are injected here; the store has no implicit globals.
pub struct LogStoreBuilder {
    capacity: usize,
    context: Option<SessionContext>,
    persistence: Option<Arc<dyn LogPersistence>>,
    escalator: Option<Arc<dyn Escalator>>,
    diagnostics: Option<Arc<dyn DiagnosticChannel>>,
}

impl Default for LogStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LogStoreBuilder {
    /// Create a builder with default capacity and no collaborators.
    #[must_use]
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            context: None,
            persistence: None,
            escalator: None,
            diagnostics: None,
        }
    }

    /// Maximum number of retained entries. Clamped to at least 1.
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Use the given session context instead of generating one.
    #[must_use]
    pub fn context(mut self, context: SessionContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Persist the buffer through the given backend.
    #[must_use]
    pub fn persistence(mut self, persistence: Arc<dyn LogPersistence>) -> Self {
        self.persistence = Some(persistence);
        self
    }

    /// Forward critical entries to the given escalator.
    #[must_use]
    pub fn escalator(mut self, escalator: Arc<dyn Escalator>) -> Self {
        self.escalator = Some(escalator);
        self
    }

    /// Report the store's own failures to the given channel instead of
    /// standard error.
    #[must_use]
    pub fn diagnostics(mut self, diagnostics: Arc<dyn DiagnosticChannel>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Build the store, hydrating the buffer from persistence when a backend
    /// is configured.
    ///
    /// A failed load degrades to an empty buffer and a diagnostic warning.
    pub async fn build(self) -> LogStore {
        let (sender, _) = broadcast::channel(1024);
        let store = LogStore {
            inner: RwLock::new(Inner {
                entries: VecDeque::with_capacity(32),
                context: self.context.unwrap_or_default(),
            }),
            capacity: self.capacity,
            persistence: self.persistence,
            escalator: self.escalator,
            diagnostics: self.diagnostics.unwrap_or_else(|| Arc::new(StderrChannel)),
            sender,
        };

        if let Some(persistence) = &store.persistence {
            match persistence.load().await {
                Ok(Some(mut entries)) => {
                    entries.truncate(store.capacity);
                    store.inner.write().unwrap().entries = entries.into();
                }
                Ok(None) => {}
                Err(e) => {
                    store
                        .diagnostics
                        .warn(&format!("failed to load persisted logs: {e}"));
                }
            }
        }

        store
    }
}
