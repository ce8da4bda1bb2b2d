//! Broadcast registry configuration

/// Configuration for leaderboard fan-out
#[derive(Debug, Clone)]
pub struct BroadcastConfig {
    /// Events a channel-backed sink keeps queued before overwriting the oldest
    pub sink_buffer: usize,

    /// Unregister sinks whose write failed once a fan-out completes
    pub evict_failed_sinks: bool,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            sink_buffer: 64,
            evict_failed_sinks: false,
        }
    }
}

impl BroadcastConfig {
    /// Set the per-sink buffer size (at least 1)
    pub fn sink_buffer(mut self, events: usize) -> Self {
        self.sink_buffer = events.max(1);
        self
    }

    /// Drop sinks as soon as a write to them fails
    pub fn evict_failed_sinks(mut self, evict: bool) -> Self {
        self.evict_failed_sinks = evict;
        self
    }
}
