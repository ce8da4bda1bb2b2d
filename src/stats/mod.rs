//! Statistics for quiz sessions and leaderboard fan-out

pub mod metrics;

pub use metrics::{BroadcastStats, SessionStats};
