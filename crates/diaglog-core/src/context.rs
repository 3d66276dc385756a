//! Session identity stamped onto recorded entries.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Process-wide identity read by the store at record time.
///
/// The session id is generated once and stays constant for the lifetime of
/// the owning store. The user id and the environment snapshot are optional
/// and apply only to entries recorded after they are set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    /// Identity of this process instance.
    pub session_id: Uuid,
    /// Current user, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Location the client is at.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Client environment description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl SessionContext {
    /// Create a context with a freshly generated session id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            user_id: None,
            url: None,
            user_agent: None,
        }
    }

    /// Create a context carrying an environment snapshot.
    #[must_use]
    pub fn with_environment(url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            user_agent: Some(user_agent.into()),
            ..Self::new()
        }
    }

    /// Set the user id applied to subsequently recorded entries.
    pub fn set_user_id(&mut self, id: impl Into<String>) {
        self.user_id = Some(id.into());
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ids_are_distinct() {
        assert_ne!(SessionContext::new().session_id, SessionContext::new().session_id);
    }

    #[test]
    fn test_with_environment() {
        let context = SessionContext::with_environment("/settings", "demo-client/1.0");
        assert_eq!(context.url.as_deref(), Some("/settings"));
        assert_eq!(context.user_agent.as_deref(), Some("demo-client/1.0"));
        assert!(context.user_id.is_none());
    }

    #[test]
    fn test_set_user_id() {
        let mut context = SessionContext::new();
        context.set_user_id("u1");
        assert_eq!(context.user_id.as_deref(), Some("u1"));
    }
}
