//! Events pushed to spectators

use crate::quiz::{LeaderboardSnapshot, Standing};

use serde::Serialize;

/// An event pushed to every connected sink
///
/// Serializes as `{"type": ..., ...fields}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum QuizEvent {
    /// Ranked scores of a session, highest first
    ///
    /// `seq` grows per session; spectators drop a board whose `seq` is lower
    /// than one they already showed for the same `session`.
    #[serde(rename = "scoreLeaderboard")]
    ScoreLeaderboard {
        session: String,
        seq: u64,
        data: Vec<Standing>,
    },
}

impl QuizEvent {
    /// Leaderboard event for a session snapshot
    pub fn leaderboard(snapshot: LeaderboardSnapshot) -> Self {
        QuizEvent::ScoreLeaderboard {
            session: snapshot.session,
            seq: snapshot.seq,
            data: snapshot.standings,
        }
    }

    /// Wire name of the event
    pub fn event_type(&self) -> &'static str {
        match self {
            QuizEvent::ScoreLeaderboard { .. } => "scoreLeaderboard",
        }
    }
}
