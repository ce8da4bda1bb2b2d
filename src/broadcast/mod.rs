//! Leaderboard fan-out
//!
//! The [`BroadcastRegistry`] holds every connected [`BroadcastSink`] and
//! pushes each event to all of them.
//!
//! # Fan-out
//!
//! ```text
//!   QuizSession::leaderboard()        (session read lock, released)
//!            │
//!            ▼
//!   QuizEvent::leaderboard() ──serde_json──► Bytes (serialized once)
//!            │
//!            ▼
//!   BroadcastRegistry::broadcast_bytes()
//!     snapshot sinks (read lock, released)
//!            │
//!    ┌───────┼────────┐   concurrent, independent
//!    ▼       ▼        ▼
//!  sink#1  sink#2   sink#3
//!    ok     err       ok      err is logged, others unaffected
//! ```
//!
//! `Bytes` is reference counted, so every sink shares the same payload
//! allocation.

pub mod config;
pub mod event;
pub mod hub;
pub mod sink;

pub use config::BroadcastConfig;
pub use event::QuizEvent;
pub use hub::{BroadcastRegistry, BroadcastReport};
pub use sink::{BroadcastSink, ChannelSink, SinkError, SinkId, SinkReceiver};
