//! Quiz value types
//!
//! Plain records with no locking of their own. The session that owns them
//! decides who may mutate them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A quiz question
///
/// The correct option is accepted on deserialization (so question sets can be
/// loaded from JSON) but is never written back out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique within a session
    pub id: String,
    /// Display text
    pub text: String,
    /// Answer options in display order
    pub options: Vec<String>,
    /// The correct option
    #[serde(skip_serializing)]
    pub correct: String,
}

impl Question {
    /// Create a new question
    pub fn new<I, S>(
        id: impl Into<String>,
        text: impl Into<String>,
        options: I,
        correct: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            text: text.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct: correct.into(),
        }
    }

    /// Check an answer against the correct option (exact match)
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct == answer
    }

    /// Participant-facing projection without the correct option
    pub fn view(&self) -> QuestionView {
        QuestionView {
            id: self.id.clone(),
            text: self.text.clone(),
            options: self.options.clone(),
        }
    }
}

/// What a participant gets to see of a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
}

/// A registered participant
///
/// Values handed out by a session are snapshots; changing them has no effect
/// on the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Identifier, unique within a session
    pub id: String,
    /// Number of accepted correct submissions
    pub score: u32,
    /// Last submitted answer per question id
    pub answers: HashMap<String, String>,
}

impl Participant {
    /// Create a participant with score 0 and no answers
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            score: 0,
            answers: HashMap::new(),
        }
    }

    /// Last answer submitted for a question, if any
    pub fn answer_for(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).map(String::as_str)
    }

    /// Leaderboard entry for this participant
    pub fn standing(&self) -> Standing {
        Standing {
            id: self.id.clone(),
            score: self.score,
        }
    }
}

/// One row of the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub id: String,
    pub score: u32,
}

/// Ranked standings of one session at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardSnapshot {
    /// Session the standings belong to
    pub session: String,
    /// Per-session counter; higher means newer
    pub seq: u64,
    /// Highest score first
    pub standings: Vec<Standing>,
}

/// Result of scoring one submitted answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    /// Whether the answer matched the correct option
    pub correct: bool,
    /// Whether the submission earned a point
    pub awarded: bool,
    /// Participant's score after this submission
    pub score: u32,
}
