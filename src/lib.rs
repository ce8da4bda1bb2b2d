//! Live multi-participant quiz sessions
//!
//! Holds quiz state in memory, scores submitted answers, and pushes live
//! leaderboard updates to every connected spectator.
//!
//! # Components
//!
//! - [`quiz::QuizSession`]: questions, participants and scores of one quiz,
//!   with a lock of its own
//! - [`registry::SessionStore`]: session id to session, with a separate lock
//! - [`broadcast::BroadcastRegistry`]: connected sinks and event fan-out
//! - [`server::QuizService`]: the calls a request layer makes
//! - [`server::LeaderboardFeed`]: newline-delimited JSON over TCP for
//!   spectators
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use quiz_rs::broadcast::BroadcastRegistry;
//! use quiz_rs::quiz::Question;
//! use quiz_rs::registry::SessionStore;
//! use quiz_rs::server::QuizService;
//!
//! # async fn demo() -> quiz_rs::Result<()> {
//! let service = QuizService::new(
//!     Arc::new(SessionStore::new()),
//!     Arc::new(BroadcastRegistry::new()),
//! );
//!
//! service
//!     .create_session(
//!         "quiz-01",
//!         vec![Question::new("q1", "2 + 2?", ["3", "4"], "4")],
//!     )
//!     .await?;
//! service.register("quiz-01", "alice").await?;
//! service.submit_answers("quiz-01", "alice", [("q1", "4")]).await?;
//! # Ok(())
//! # }
//! ```

pub mod broadcast;
pub mod error;
pub mod quiz;
pub mod registry;
pub mod server;
pub mod stats;

pub use error::{QuizError, Result};
