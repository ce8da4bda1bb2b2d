//! Push sinks
//!
//! A sink is one live connection that can take a serialized event. The
//! registry only ever sees the [`BroadcastSink`] trait; transports provide
//! the implementation.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

/// Identity of a registered sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SinkId(pub u64);

impl std::fmt::Display for SinkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sink-{}", self.0)
    }
}

/// Failure writing to one sink
#[derive(Debug, Error)]
pub enum SinkError {
    /// The connection behind the sink is gone
    #[error("sink closed")]
    Closed,
    /// Transport write failed
    #[error("sink write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A live connection that accepts pushed events
///
/// `send` may be called concurrently for different sinks and must not wait
/// on the remote peer for long; a stalled peer should surface as an error.
#[async_trait]
pub trait BroadcastSink: Send + Sync {
    /// Push one serialized event
    async fn send(&self, payload: Bytes) -> Result<(), SinkError>;
}

/// Sink backed by a bounded ring buffer
///
/// Sending never waits. When the reader falls behind, the oldest queued
/// events are overwritten, so the newest leaderboard is always the last one
/// the reader sees.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: broadcast::Sender<Bytes>,
}

impl ChannelSink {
    /// Create a sink and the receiver that drains it
    pub fn new(buffer: usize) -> (Self, SinkReceiver) {
        let (tx, rx) = broadcast::channel(buffer.max(1));
        (Self { tx }, SinkReceiver { rx })
    }

    /// Whether the receiving half has been dropped
    pub fn is_closed(&self) -> bool {
        self.tx.receiver_count() == 0
    }
}

#[async_trait]
impl BroadcastSink for ChannelSink {
    async fn send(&self, payload: Bytes) -> Result<(), SinkError> {
        self.tx
            .send(payload)
            .map(|_| ())
            .map_err(|_| SinkError::Closed)
    }
}

/// Receiving half of a [`ChannelSink`]
///
/// Events overwritten while the reader lagged are skipped silently.
#[derive(Debug)]
pub struct SinkReceiver {
    rx: broadcast::Receiver<Bytes>,
}

impl SinkReceiver {
    /// Wait for the next event; `None` once the sink is dropped
    pub async fn recv(&mut self) -> Option<Bytes> {
        loop {
            match self.rx.recv().await {
                Ok(payload) => return Some(payload),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Slow reader skipped stale events");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next queued event without waiting
    pub fn try_recv(&mut self) -> Option<Bytes> {
        loop {
            match self.rx.try_recv() {
                Ok(payload) => return Some(payload),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }
}
