//! Statistics for quiz sessions and leaderboard fan-out

use std::time::Duration;

/// Session-level statistics
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    /// Registered participants
    pub participants: usize,
    /// Questions in the session
    pub questions: usize,
    /// Answers submitted, including re-submissions
    pub submissions: u64,
    /// Submitted answers that matched the correct option
    pub correct_submissions: u64,
    /// Time since the session was created
    pub age: Duration,
}

impl SessionStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of submissions that were correct
    pub fn accuracy(&self) -> f64 {
        if self.submissions > 0 {
            self.correct_submissions as f64 / self.submissions as f64
        } else {
            0.0
        }
    }
}

/// Broadcast registry statistics
#[derive(Debug, Clone, Default)]
pub struct BroadcastStats {
    /// Currently registered sinks
    pub sinks: usize,
    /// Events broadcast so far
    pub broadcasts: u64,
    /// Successful sink writes
    pub delivered: u64,
    /// Failed sink writes
    pub failed: u64,
}

impl BroadcastStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of sink writes that failed
    pub fn failure_rate(&self) -> f64 {
        let attempts = self.delivered + self.failed;
        if attempts > 0 {
            self.failed as f64 / attempts as f64
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_stats_new() {
        let stats = SessionStats::new();
        assert_eq!(stats.participants, 0);
        assert_eq!(stats.submissions, 0);
        assert_eq!(stats.correct_submissions, 0);
    }

    #[test]
    fn test_session_stats_accuracy() {
        let mut stats = SessionStats::new();
        stats.submissions = 8;
        stats.correct_submissions = 6;

        assert!((stats.accuracy() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_session_stats_accuracy_no_submissions() {
        let stats = SessionStats::new();

        // No submissions yet, accuracy stays at 0
        assert_eq!(stats.accuracy(), 0.0);
    }

    #[test]
    fn test_broadcast_stats_failure_rate() {
        let mut stats = BroadcastStats::new();
        assert_eq!(stats.failure_rate(), 0.0);

        stats.delivered = 3;
        stats.failed = 1;
        assert!((stats.failure_rate() - 0.25).abs() < f64::EPSILON);
    }
}
