//! Session store
//!
//! The store maps session ids to live [`QuizSession`]s. It has its own lock,
//! separate from the lock inside each session.
//!
//! # Architecture
//!
//! ```text
//!                     Arc<SessionStore>
//!               ┌──────────────────────────────┐
//!               │ sessions: RwLock<HashMap<Id, │
//!               │   Arc<QuizSession {          │
//!               │     roster: RwLock<..>,      │
//!               │   }>                         │
//!               │ >>                           │
//!               └──────────────┬───────────────┘
//!                              │ get() clones the Arc,
//!                              │ store lock released
//!               ┌──────────────┼──────────────┐
//!               ▼              ▼              ▼
//!         submit_answer   add_participant  leaderboard
//!        (session lock)   (session lock)  (session lock)
//! ```
//!
//! Creating a session takes the store write lock briefly. Score traffic only
//! ever holds the store read lock long enough to clone an `Arc`.
//!
//! [`QuizSession`]: crate::quiz::QuizSession

pub mod config;
pub mod store;

pub use config::{RegistryConfig, ScoringPolicy};
pub use store::SessionStore;
