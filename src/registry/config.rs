//! Session store configuration

/// How repeated correct answers to the same question are scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoringPolicy {
    /// Every correct submission scores, including re-submissions of an
    /// already answered question
    #[default]
    EveryCorrectSubmission,
    /// A question scores at most once per participant
    OncePerQuestion,
}

/// Configuration for the session store
#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
    /// Scoring policy applied to sessions created by the store
    pub scoring: ScoringPolicy,
}

impl RegistryConfig {
    /// Set the scoring policy
    pub fn scoring(mut self, policy: ScoringPolicy) -> Self {
        self.scoring = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();

        assert_eq!(config.scoring, ScoringPolicy::EveryCorrectSubmission);
    }

    #[test]
    fn test_builder_scoring() {
        let config = RegistryConfig::default().scoring(ScoringPolicy::OncePerQuestion);

        assert_eq!(config.scoring, ScoringPolicy::OncePerQuestion);
    }
}
