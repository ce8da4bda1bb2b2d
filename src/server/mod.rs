//! Request facade and spectator push transport

pub mod config;
pub mod listener;
pub mod service;

pub use config::FeedConfig;
pub use listener::LeaderboardFeed;
pub use service::QuizService;
