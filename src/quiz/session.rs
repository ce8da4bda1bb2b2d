//! Quiz session engine
//!
//! A session owns an immutable question sequence and a roster of
//! participants. The roster sits behind a `RwLock` that belongs to this
//! session alone, so traffic on one session never waits on another.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tokio::sync::RwLock;

use super::model::{
    AnswerOutcome, LeaderboardSnapshot, Participant, Question, QuestionView, Standing,
};
use crate::error::{QuizError, Result};
use crate::registry::config::ScoringPolicy;
use crate::stats::SessionStats;

/// Mutable per-session state guarded by the session lock
#[derive(Debug, Default)]
struct Roster {
    /// Participants in registration order
    participants: Vec<Participant>,

    /// Participant id to position in `participants`
    index: HashMap<String, usize>,

    /// (participant, question) pairs already credited under `OncePerQuestion`
    credited: HashSet<(String, String)>,

    /// Total submissions accepted
    submissions: u64,

    /// Submissions whose answer matched
    correct_submissions: u64,
}

impl Roster {
    fn position(&self, participant_id: &str) -> Result<usize> {
        self.index
            .get(participant_id)
            .copied()
            .ok_or_else(|| QuizError::ParticipantNotFound(participant_id.to_string()))
    }

    /// Score one answer and store it. Caller holds the write lock.
    fn apply(
        &mut self,
        position: usize,
        question: &Question,
        answer: String,
        scoring: ScoringPolicy,
    ) -> AnswerOutcome {
        let correct = question.is_correct(&answer);
        let participant = &mut self.participants[position];

        let awarded = correct
            && match scoring {
                ScoringPolicy::EveryCorrectSubmission => true,
                ScoringPolicy::OncePerQuestion => self
                    .credited
                    .insert((participant.id.clone(), question.id.clone())),
            };

        if awarded {
            participant.score = participant.score.saturating_add(1);
        }
        participant.answers.insert(question.id.clone(), answer);

        self.submissions += 1;
        if correct {
            self.correct_submissions += 1;
        }

        AnswerOutcome {
            correct,
            awarded,
            score: participant.score,
        }
    }
}

/// A live quiz session
pub struct QuizSession {
    id: String,

    /// Fixed at creation, read without locking
    questions: Vec<Question>,

    roster: RwLock<Roster>,

    scoring: ScoringPolicy,

    /// Last sequence number handed out by `leaderboard`
    leaderboard_seq: AtomicU64,

    created_at: Instant,
}

impl QuizSession {
    /// Create a session with the reference scoring policy
    pub fn new(id: impl Into<String>, questions: Vec<Question>) -> Self {
        Self::with_scoring(id, questions, ScoringPolicy::default())
    }

    /// Create a session with an explicit scoring policy
    pub fn with_scoring(
        id: impl Into<String>,
        questions: Vec<Question>,
        scoring: ScoringPolicy,
    ) -> Self {
        Self {
            id: id.into(),
            questions,
            roster: RwLock::new(Roster::default()),
            scoring,
            leaderboard_seq: AtomicU64::new(0),
            created_at: Instant::now(),
        }
    }

    /// Session identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Scoring policy in effect
    pub fn scoring(&self) -> ScoringPolicy {
        self.scoring
    }

    /// Full question sequence, including correct options
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Question sequence as participants may see it
    pub fn question_views(&self) -> Vec<QuestionView> {
        self.questions.iter().map(Question::view).collect()
    }

    /// Register a participant with score 0
    pub async fn add_participant(&self, participant_id: &str) -> Result<()> {
        let mut roster = self.roster.write().await;

        if roster.index.contains_key(participant_id) {
            return Err(QuizError::DuplicateParticipant(participant_id.to_string()));
        }

        let position = roster.participants.len();
        roster.participants.push(Participant::new(participant_id));
        roster.index.insert(participant_id.to_string(), position);

        tracing::info!(
            session = %self.id,
            participant = participant_id,
            participants = roster.participants.len(),
            "Participant registered"
        );

        Ok(())
    }

    /// Snapshot of a participant
    pub async fn get_participant(&self, participant_id: &str) -> Result<Participant> {
        let roster = self.roster.read().await;
        let position = roster.position(participant_id)?;
        Ok(roster.participants[position].clone())
    }

    /// Whether a participant is registered, without copying it
    pub async fn contains_participant(&self, participant_id: &str) -> bool {
        self.roster.read().await.index.contains_key(participant_id)
    }

    /// Look up a question by id
    pub fn get_question(&self, question_id: &str) -> Result<&Question> {
        self.questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or_else(|| QuizError::QuestionNotFound(question_id.to_string()))
    }

    /// Score and record one answer
    ///
    /// The stored answer is always overwritten. Whether a repeated correct
    /// answer scores again depends on the session's [`ScoringPolicy`].
    pub async fn submit_answer(
        &self,
        participant_id: &str,
        question_id: &str,
        answer: impl Into<String>,
    ) -> Result<AnswerOutcome> {
        let mut roster = self.roster.write().await;

        let position = roster.position(participant_id)?;
        let question = self.get_question(question_id)?;
        let outcome = roster.apply(position, question, answer.into(), self.scoring);

        tracing::debug!(
            session = %self.id,
            participant = participant_id,
            question = question_id,
            correct = outcome.correct,
            score = outcome.score,
            "Answer submitted"
        );

        Ok(outcome)
    }

    /// Score and record a batch of answers
    ///
    /// The participant is checked first, then every question id, before
    /// anything is applied, so either every answer lands or none does.
    /// Answers are applied in iteration order under a single write lock.
    pub async fn submit_answers<I, Q, A>(
        &self,
        participant_id: &str,
        answers: I,
    ) -> Result<Vec<AnswerOutcome>>
    where
        I: IntoIterator<Item = (Q, A)>,
        Q: AsRef<str>,
        A: Into<String>,
    {
        let mut roster = self.roster.write().await;
        let position = roster.position(participant_id)?;

        let resolved = answers
            .into_iter()
            .map(|(question_id, answer)| {
                self.get_question(question_id.as_ref())
                    .map(|question| (question, answer.into()))
            })
            .collect::<Result<Vec<_>>>()?;

        let outcomes: Vec<AnswerOutcome> = resolved
            .into_iter()
            .map(|(question, answer)| roster.apply(position, question, answer, self.scoring))
            .collect();

        tracing::debug!(
            session = %self.id,
            participant = participant_id,
            answers = outcomes.len(),
            correct = outcomes.iter().filter(|o| o.correct).count(),
            score = roster.participants[position].score,
            "Answers submitted"
        );

        Ok(outcomes)
    }

    /// All participants by descending score
    ///
    /// Equal scores keep registration order, so repeated calls on unchanged
    /// state return the same sequence.
    pub async fn list_participants_by_rank(&self) -> Vec<Participant> {
        let mut ranked = self.roster.read().await.participants.clone();
        // sort_by is stable
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
    }

    /// Ranked `{id, score}` rows for the leaderboard
    ///
    /// Each snapshot gets the next sequence number of this session. The
    /// number is taken under the roster lock, so a later number never
    /// describes an older roster state.
    pub async fn leaderboard(&self) -> LeaderboardSnapshot {
        let roster = self.roster.read().await;
        let mut standings: Vec<Standing> =
            roster.participants.iter().map(Participant::standing).collect();
        let seq = self.leaderboard_seq.fetch_add(1, Ordering::Relaxed) + 1;
        drop(roster);

        standings.sort_by(|a, b| b.score.cmp(&a.score));
        LeaderboardSnapshot {
            session: self.id.clone(),
            seq,
            standings,
        }
    }

    /// Number of registered participants
    pub async fn participant_count(&self) -> usize {
        self.roster.read().await.participants.len()
    }

    /// Session statistics
    pub async fn stats(&self) -> SessionStats {
        let roster = self.roster.read().await;
        SessionStats {
            participants: roster.participants.len(),
            questions: self.questions.len(),
            submissions: roster.submissions,
            correct_submissions: roster.correct_submissions,
            age: self.created_at.elapsed(),
        }
    }
}

impl std::fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizSession")
            .field("id", &self.id)
            .field("questions", &self.questions.len())
            .field("scoring", &self.scoring)
            .finish_non_exhaustive()
    }
}
