//! Session store implementation
//!
//! The process-scoped registry of quiz sessions.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::config::RegistryConfig;
use crate::error::{QuizError, Result};
use crate::quiz::{Question, QuizSession};

/// Registry of all quiz sessions
///
/// Thread-safe via `RwLock`. Lookups take the read lock only long enough to
/// clone the session's `Arc`; the session's own lock is never acquired while
/// the store lock is held.
pub struct SessionStore {
    /// Map of session id to session
    sessions: RwLock<HashMap<String, Arc<QuizSession>>>,

    /// Configuration
    config: RegistryConfig,
}

impl SessionStore {
    /// Create a new store with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a new store with custom configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Get the store configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Create and register a session
    ///
    /// Returns an error if a session with this id is already registered; the
    /// existing session is left untouched.
    pub async fn create(
        &self,
        id: impl Into<String>,
        questions: Vec<Question>,
    ) -> Result<Arc<QuizSession>> {
        let id = id.into();
        let mut sessions = self.sessions.write().await;

        if sessions.contains_key(&id) {
            return Err(QuizError::DuplicateSession(id));
        }

        let session = Arc::new(QuizSession::with_scoring(
            id.clone(),
            questions,
            self.config.scoring,
        ));
        sessions.insert(id.clone(), Arc::clone(&session));

        tracing::info!(
            session = %id,
            questions = session.questions().len(),
            scoring = ?self.config.scoring,
            "Quiz session created"
        );

        Ok(session)
    }

    /// Look up a session
    pub async fn get(&self, id: &str) -> Result<Arc<QuizSession>> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| QuizError::SessionNotFound(id.to_string()))
    }

    /// Remove a session from the store
    ///
    /// Callers still holding the session keep a working handle. Returns
    /// whether the session existed.
    pub async fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            tracing::info!(session = %id, "Quiz session removed");
        }
        removed
    }

    /// Ids of all registered sessions, sorted
    pub async fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Get total number of sessions
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
