//! HTTP escalation sink.

use async_trait::async_trait;
use diaglog_core::{EscalateError, Escalator};
use serde_json::Value;
use uuid::Uuid;

use crate::EscalationPayload;

/// Escalator that POSTs JSON payloads to an HTTP endpoint.
///
/// The endpoint is environment-provided configuration. Transport failures
/// and non-success statuses map to [`EscalateError::Transport`]; the store
/// contains them, so a dead sink never disturbs recording.
pub struct HttpEscalator {
    client: reqwest::Client,
    endpoint: String,
    session_id: Option<Uuid>,
}

impl HttpEscalator {
    /// Create an escalator for the given endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            session_id: None,
        }
    }

    /// Stamp outgoing payloads with the reporting session's id.
    #[must_use]
    pub fn with_session(mut self, session_id: Uuid) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// Endpoint this escalator posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Escalator for HttpEscalator {
    async fn escalate(&self, message: &str, data: Option<Value>) -> Result<(), EscalateError> {
        let mut payload = EscalationPayload::new(message, data);
        if let Some(session_id) = self.session_id {
            payload = payload.with_session(session_id);
        }

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| EscalateError::Transport(e.to_string()))?;

        response
            .error_for_status()
            .map_err(|e| EscalateError::Transport(e.to_string()))?;

        tracing::debug!("escalated event to {}", self.endpoint);
        Ok(())
    }
}
