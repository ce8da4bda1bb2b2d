//! Broadcast registry implementation
//!
//! Tracks every live sink and fans each event out to all of them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use futures::future::join_all;
use serde::Serialize;
use tokio::sync::RwLock;

use super::config::BroadcastConfig;
use super::sink::{BroadcastSink, ChannelSink, SinkId, SinkReceiver};
use crate::error::Result;
use crate::stats::BroadcastStats;

/// Outcome of one fan-out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Sinks the event was attempted on
    pub recipients: usize,
    /// Sinks that accepted the event
    pub delivered: usize,
    /// Sinks whose write failed
    pub failed: Vec<SinkId>,
}

/// Registry of connected sinks
///
/// Sinks are keyed by [`SinkId`], so removal is idempotent and the same
/// sink object may be registered more than once under different ids.
pub struct BroadcastRegistry {
    /// Connected sinks
    sinks: RwLock<HashMap<SinkId, Arc<dyn BroadcastSink>>>,

    next_sink_id: AtomicU64,

    broadcasts: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,

    config: BroadcastConfig,
}

impl BroadcastRegistry {
    /// Create a registry with default configuration
    pub fn new() -> Self {
        Self::with_config(BroadcastConfig::default())
    }

    /// Create a registry with custom configuration
    pub fn with_config(config: BroadcastConfig) -> Self {
        Self {
            sinks: RwLock::new(HashMap::new()),
            next_sink_id: AtomicU64::new(1),
            broadcasts: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            config,
        }
    }

    /// Get the registry configuration
    pub fn config(&self) -> &BroadcastConfig {
        &self.config
    }

    /// Register a sink
    pub async fn register(&self, sink: Arc<dyn BroadcastSink>) -> SinkId {
        let id = SinkId(self.next_sink_id.fetch_add(1, Ordering::Relaxed));
        let mut sinks = self.sinks.write().await;
        sinks.insert(id, sink);

        tracing::info!(sink = %id, sinks = sinks.len(), "Sink registered");
        id
    }

    /// Create a channel-backed sink sized by the config and register it
    pub async fn register_channel(&self) -> (SinkId, SinkReceiver) {
        let (sink, rx) = ChannelSink::new(self.config.sink_buffer);
        let id = self.register(Arc::new(sink)).await;
        (id, rx)
    }

    /// Remove a sink
    ///
    /// Returns whether the sink was registered. Safe to call more than once.
    pub async fn unregister(&self, id: SinkId) -> bool {
        let mut sinks = self.sinks.write().await;
        let removed = sinks.remove(&id).is_some();

        if removed {
            tracing::info!(sink = %id, sinks = sinks.len(), "Sink unregistered");
        }
        removed
    }

    /// Serialize an event once and push it to every sink
    ///
    /// Fails only if the event cannot be serialized. Sink failures are
    /// logged and reported, never returned as errors.
    pub async fn broadcast<E>(&self, event: &E) -> Result<BroadcastReport>
    where
        E: Serialize + ?Sized,
    {
        let payload = Bytes::from(serde_json::to_vec(event)?);
        Ok(self.broadcast_bytes(payload).await)
    }

    /// Push an already serialized event to every sink
    ///
    /// The sink set is snapshotted and the lock released before any write,
    /// and all writes run concurrently.
    pub async fn broadcast_bytes(&self, payload: Bytes) -> BroadcastReport {
        let targets: Vec<(SinkId, Arc<dyn BroadcastSink>)> = self
            .sinks
            .read()
            .await
            .iter()
            .map(|(id, sink)| (*id, Arc::clone(sink)))
            .collect();

        // Bytes clones share one allocation
        let results = join_all(targets.iter().map(|(id, sink)| {
            let payload = payload.clone();
            async move { (*id, sink.send(payload).await) }
        }))
        .await;

        let mut report = BroadcastReport {
            recipients: targets.len(),
            ..Default::default()
        };
        for (id, result) in results {
            match result {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!(sink = %id, error = %e, "Failed to push event to sink");
                    report.failed.push(id);
                }
            }
        }

        self.broadcasts.fetch_add(1, Ordering::Relaxed);
        self.delivered
            .fetch_add(report.delivered as u64, Ordering::Relaxed);
        self.failed
            .fetch_add(report.failed.len() as u64, Ordering::Relaxed);

        tracing::debug!(
            recipients = report.recipients,
            delivered = report.delivered,
            failed = report.failed.len(),
            bytes = payload.len(),
            "Broadcast event"
        );

        if self.config.evict_failed_sinks && !report.failed.is_empty() {
            let mut sinks = self.sinks.write().await;
            for id in &report.failed {
                if sinks.remove(id).is_some() {
                    tracing::info!(sink = %id, "Sink evicted after failed write");
                }
            }
        }

        report
    }

    /// Get number of registered sinks
    pub async fn sink_count(&self) -> usize {
        self.sinks.read().await.len()
    }

    /// Registry statistics
    pub async fn stats(&self) -> BroadcastStats {
        BroadcastStats {
            sinks: self.sink_count().await,
            broadcasts: self.broadcasts.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

impl Default for BroadcastRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::broadcast::event::QuizEvent;
    use crate::broadcast::sink::SinkError;
    use crate::quiz::{LeaderboardSnapshot, Standing};

    struct FailingSink;

    #[async_trait]
    impl BroadcastSink for FailingSink {
        async fn send(&self, _payload: Bytes) -> std::result::Result<(), SinkError> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe).into())
        }
    }

    fn board(id: &str, seq: u64, score: u32) -> QuizEvent {
        QuizEvent::leaderboard(LeaderboardSnapshot {
            session: "quiz-01".into(),
            seq,
            standings: vec![Standing {
                id: id.into(),
                score,
            }],
        })
    }

    fn leaderboard() -> QuizEvent {
        board("alice", 1, 1)
    }

    #[tokio::test]
    async fn test_register_unregister() {
        let registry = BroadcastRegistry::new();

        let (id, _rx) = registry.register_channel().await;
        assert_eq!(registry.sink_count().await, 1);

        assert!(registry.unregister(id).await);
        assert!(!registry.unregister(id).await);
        assert_eq!(registry.sink_count().await, 0);
    }

    #[tokio::test]
    async fn test_same_sink_registered_twice() {
        let registry = BroadcastRegistry::new();
        let (sink, mut rx) = ChannelSink::new(8);
        let sink: Arc<dyn BroadcastSink> = Arc::new(sink);

        let first = registry.register(Arc::clone(&sink)).await;
        let second = registry.register(sink).await;
        assert_ne!(first, second);

        let report = registry.broadcast(&leaderboard()).await.unwrap();
        assert_eq!(report.delivered, 2);
        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_broadcast_payload() {
        let registry = BroadcastRegistry::new();
        let (_id, mut rx) = registry.register_channel().await;

        registry.broadcast(&leaderboard()).await.unwrap();

        let payload = rx.recv().await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(value["type"], "scoreLeaderboard");
        assert_eq!(value["data"][0]["id"], "alice");
        assert_eq!(value["data"][0]["score"], 1);
    }

    #[tokio::test]
    async fn test_slow_reader_ends_on_latest_board() {
        let registry = BroadcastRegistry::with_config(BroadcastConfig::default().sink_buffer(1));
        let (_id, mut rx) = registry.register_channel().await;

        let first = board("p", 1, 1);
        let second = board("p", 2, 2);
        assert_eq!(registry.broadcast(&first).await.unwrap().delivered, 1);
        assert_eq!(registry.broadcast(&second).await.unwrap().delivered, 1);

        let payload = rx.recv().await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(value["seq"], 2);
        assert_eq!(value["data"][0]["score"], 2);
        assert!(rx.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_failed_sink_does_not_block_others() {
        let registry = BroadcastRegistry::new();

        let (sink1, mut rx1) = ChannelSink::new(8);
        let (sink3, mut rx3) = ChannelSink::new(8);
        registry.register(Arc::new(sink1)).await;
        let failing = registry.register(Arc::new(FailingSink)).await;
        registry.register(Arc::new(sink3)).await;

        let report = registry.broadcast(&leaderboard()).await.unwrap();

        assert_eq!(report.recipients, 3);
        assert_eq!(report.delivered, 2);
        assert_eq!(report.failed, vec![failing]);
        assert!(rx1.try_recv().is_some());
        assert!(rx3.try_recv().is_some());

        // Without eviction the failing sink stays registered
        assert_eq!(registry.sink_count().await, 3);
    }

    #[tokio::test]
    async fn test_evict_failed_sinks() {
        let registry =
            BroadcastRegistry::with_config(BroadcastConfig::default().evict_failed_sinks(true));

        let (_id, _rx) = registry.register_channel().await;
        registry.register(Arc::new(FailingSink)).await;

        registry.broadcast(&leaderboard()).await.unwrap();

        assert_eq!(registry.sink_count().await, 1);
    }

    #[tokio::test]
    async fn test_broadcast_without_sinks() {
        let registry = BroadcastRegistry::new();

        let report = registry.broadcast(&leaderboard()).await.unwrap();

        assert_eq!(report, BroadcastReport::default());
    }

    #[tokio::test]
    async fn test_stats() {
        let registry = BroadcastRegistry::new();
        let (_id, _rx) = registry.register_channel().await;
        registry.register(Arc::new(FailingSink)).await;

        registry.broadcast(&leaderboard()).await.unwrap();
        registry.broadcast(&leaderboard()).await.unwrap();

        let stats = registry.stats().await;
        assert_eq!(stats.sinks, 2);
        assert_eq!(stats.broadcasts, 2);
        assert_eq!(stats.delivered, 2);
        assert_eq!(stats.failed, 2);
    }
}
