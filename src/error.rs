//! Error types
//!
//! All quiz errors are local, recoverable conditions handed back to the
//! caller. Sink write failures have their own type in
//! [`crate::broadcast::SinkError`] and never surface here.

use thiserror::Error;

/// Error type for quiz operations
#[derive(Debug, Error)]
pub enum QuizError {
    /// A participant with this id is already registered in the session
    #[error("Participant already exists: {0}")]
    DuplicateParticipant(String),

    /// No participant with this id in the session
    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),

    /// No question with this id in the session
    #[error("Question not found: {0}")]
    QuestionNotFound(String),

    /// No session with this id in the store
    #[error("Quiz session not found: {0}")]
    SessionNotFound(String),

    /// A session with this id is already registered in the store
    #[error("Quiz session already exists: {0}")]
    DuplicateSession(String),

    /// Participant id was empty
    #[error("Participant ID is required")]
    InvalidParticipantId,

    /// Event could not be serialized
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Transport I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuizError {
    /// Whether this error means a looked-up entity does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            QuizError::ParticipantNotFound(_)
                | QuizError::QuestionNotFound(_)
                | QuizError::SessionNotFound(_)
        )
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, QuizError>;
