//! Quiz request facade
//!
//! [`QuizService`] is what a request layer calls into. It resolves sessions
//! through the store, runs the session operation, and pushes a fresh
//! leaderboard to every spectator after question reads and answer writes.

use std::sync::Arc;

use crate::broadcast::{BroadcastRegistry, BroadcastReport, QuizEvent};
use crate::error::{QuizError, Result};
use crate::quiz::{AnswerOutcome, Question, QuestionView, QuizSession};
use crate::registry::SessionStore;

/// Request-facing entry point to the quiz engine
///
/// Cheap to clone; clones share the same store and broadcaster.
#[derive(Clone)]
pub struct QuizService {
    store: Arc<SessionStore>,
    broadcaster: Arc<BroadcastRegistry>,
}

impl QuizService {
    /// Create a service over the given store and broadcaster
    pub fn new(store: Arc<SessionStore>, broadcaster: Arc<BroadcastRegistry>) -> Self {
        Self { store, broadcaster }
    }

    /// Get a reference to the session store
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Get a reference to the broadcast registry
    pub fn broadcaster(&self) -> &Arc<BroadcastRegistry> {
        &self.broadcaster
    }

    /// Create a quiz session
    pub async fn create_session(
        &self,
        session_id: impl Into<String>,
        questions: Vec<Question>,
    ) -> Result<Arc<QuizSession>> {
        self.store.create(session_id, questions).await
    }

    /// Register a participant in a session
    pub async fn register(&self, session_id: &str, participant_id: &str) -> Result<()> {
        if participant_id.is_empty() {
            return Err(QuizError::InvalidParticipantId);
        }

        let session = self.store.get(session_id).await?;
        session.add_participant(participant_id).await
    }

    /// Questions of a session as the participant may see them
    ///
    /// The participant must be registered. Publishes the leaderboard.
    pub async fn list_questions(
        &self,
        session_id: &str,
        participant_id: &str,
    ) -> Result<Vec<QuestionView>> {
        let session = self.store.get(session_id).await?;
        if !session.contains_participant(participant_id).await {
            return Err(QuizError::ParticipantNotFound(participant_id.to_string()));
        }

        self.publish_leaderboard_quietly(&session).await;

        Ok(session.question_views())
    }

    /// Submit a participant's answers, keyed by question id
    ///
    /// Nothing is applied if any question id is unknown. On success the
    /// leaderboard is published.
    pub async fn submit_answers<I, Q, A>(
        &self,
        session_id: &str,
        participant_id: &str,
        answers: I,
    ) -> Result<Vec<AnswerOutcome>>
    where
        I: IntoIterator<Item = (Q, A)>,
        Q: AsRef<str>,
        A: Into<String>,
    {
        let session = self.store.get(session_id).await?;
        let outcomes = session.submit_answers(participant_id, answers).await?;

        self.publish_leaderboard_quietly(&session).await;

        Ok(outcomes)
    }

    /// Push the session's current leaderboard to every sink
    pub async fn publish_leaderboard(&self, session: &QuizSession) -> Result<BroadcastReport> {
        // Snapshot first; no session lock is held during the fan-out
        let board = session.leaderboard().await;
        let seq = board.seq;
        let event = QuizEvent::leaderboard(board);

        tracing::debug!(
            session = %session.id(),
            seq,
            event = event.event_type(),
            "Publishing leaderboard"
        );
        self.broadcaster.broadcast(&event).await
    }

    async fn publish_leaderboard_quietly(&self, session: &QuizSession) {
        if let Err(e) = self.publish_leaderboard(session).await {
            tracing::warn!(session = %session.id(), error = %e, "Failed to publish leaderboard");
        }
    }
}
