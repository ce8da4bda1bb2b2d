//! Leaderboard feed listener
//!
//! A TCP push transport for spectators. Each accepted connection is
//! registered as a sink and receives one JSON event per line until it
//! disconnects.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;

use crate::broadcast::{BroadcastRegistry, SinkReceiver};
use crate::error::Result;
use crate::server::config::FeedConfig;

/// Leaderboard push server
pub struct LeaderboardFeed {
    config: FeedConfig,
    broadcaster: Arc<BroadcastRegistry>,
    connection_semaphore: Option<Arc<Semaphore>>,
}

impl LeaderboardFeed {
    /// Create a feed that registers its connections with `broadcaster`
    pub fn new(config: FeedConfig, broadcaster: Arc<BroadcastRegistry>) -> Self {
        let connection_semaphore = if config.max_connections > 0 {
            Some(Arc::new(Semaphore::new(config.max_connections)))
        } else {
            None
        };

        Self {
            config,
            broadcaster,
            connection_semaphore,
        }
    }

    /// Get a reference to the broadcast registry
    pub fn broadcaster(&self) -> &Arc<BroadcastRegistry> {
        &self.broadcaster
    }

    /// Bind to the configured address and run
    ///
    /// This method blocks until the listener fails.
    pub async fn run(&self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Run the feed with graceful shutdown
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()>,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;

        tokio::select! {
            _ = shutdown => {
                tracing::info!("Shutdown signal received");
                Ok(())
            }
            result = self.serve(listener) => result,
        }
    }

    /// Accept connections on an already bound listener
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        tracing::info!(addr = %listener.local_addr()?, "Leaderboard feed listening");

        loop {
            match listener.accept().await {
                Ok((socket, peer_addr)) => {
                    self.handle_connection(socket, peer_addr);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }

    fn handle_connection(&self, socket: TcpStream, peer_addr: SocketAddr) {
        // Check connection limit
        let permit = if let Some(ref sem) = self.connection_semaphore {
            match sem.clone().try_acquire_owned() {
                Ok(permit) => Some(permit),
                Err(_) => {
                    tracing::warn!(peer = %peer_addr, "Connection rejected: limit reached");
                    return;
                }
            }
        } else {
            None
        };

        if self.config.tcp_nodelay {
            if let Err(e) = socket.set_nodelay(true) {
                tracing::error!(error = %e, "Failed to configure socket");
                return;
            }
        }

        let broadcaster = Arc::clone(&self.broadcaster);
        let read_buffer_size = self.config.read_buffer_size;

        tokio::spawn(async move {
            // Held for the lifetime of the connection
            let _permit = permit;

            let (sink_id, rx) = broadcaster.register_channel().await;
            tracing::debug!(sink = %sink_id, peer = %peer_addr, "Spectator connected");

            if let Err(e) = forward_events(socket, rx, read_buffer_size).await {
                tracing::debug!(sink = %sink_id, error = %e, "Spectator connection error");
            }

            broadcaster.unregister(sink_id).await;
            tracing::debug!(sink = %sink_id, peer = %peer_addr, "Spectator disconnected");
        });
    }
}

/// Write queued events to the socket until either side goes away
///
/// Anything the client sends is read and discarded; EOF ends the connection.
async fn forward_events(
    socket: TcpStream,
    mut rx: SinkReceiver,
    read_buffer_size: usize,
) -> Result<()> {
    let (mut reader, mut writer) = socket.into_split();
    let mut buf = vec![0u8; read_buffer_size.max(1)];

    loop {
        tokio::select! {
            payload = rx.recv() => match payload {
                Some(payload) => {
                    writer.write_all(&payload).await?;
                    writer.write_all(b"\n").await?;
                }
                None => return Ok(()),
            },
            read = reader.read(&mut buf) => match read? {
                0 => return Ok(()),
                _ => continue,
            },
        }
    }
}
