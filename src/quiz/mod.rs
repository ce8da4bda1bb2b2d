//! Quiz sessions
//!
//! A [`QuizSession`] holds a fixed set of [`Question`]s and a growing roster
//! of [`Participant`]s. Participants register, submit answers, and are
//! ranked by score.
//!
//! # Locking
//!
//! ```text
//!   QuizSession
//!   ├── questions: Vec<Question>        immutable, no lock
//!   └── roster: RwLock<Roster>
//!         ├── participants (registration order)
//!         └── index: id -> position
//!
//!   add_participant / submit_answer(s)   write lock
//!   get_participant / ranking / stats    read lock
//!   get_question                         no lock
//! ```
//!
//! Reads return clones, never references into the roster.

pub mod model;
pub mod session;

pub use model::{
    AnswerOutcome, LeaderboardSnapshot, Participant, Question, QuestionView, Standing,
};
pub use session::QuizSession;
