//! Leaderboard feed configuration

use std::net::SocketAddr;

/// Leaderboard feed options
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Maximum concurrent spectator connections (0 = unlimited)
    pub max_connections: usize,

    /// Enable TCP_NODELAY (disable Nagle's algorithm)
    pub tcp_nodelay: bool,

    /// Read buffer for draining client input
    pub read_buffer_size: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 9091)),
            max_connections: 0, // Unlimited
            tcp_nodelay: true,
            read_buffer_size: 1024,
        }
    }
}

impl FeedConfig {
    /// Create a new config with custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set maximum connections
    pub fn max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }

    /// Enable or disable TCP_NODELAY
    pub fn tcp_nodelay(mut self, enabled: bool) -> Self {
        self.tcp_nodelay = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FeedConfig::default();

        assert_eq!(config.bind_addr.port(), 9091);
        assert_eq!(config.max_connections, 0);
        assert!(config.tcp_nodelay);
    }

    #[test]
    fn test_with_addr() {
        let addr: SocketAddr = "127.0.0.1:9191".parse().unwrap();
        let config = FeedConfig::with_addr(addr);

        assert_eq!(config.bind_addr.port(), 9191);
    }

    #[test]
    fn test_builder_chaining() {
        let addr: SocketAddr = "127.0.0.1:9092".parse().unwrap();
        let config = FeedConfig::default()
            .bind(addr)
            .max_connections(50)
            .tcp_nodelay(false);

        assert_eq!(config.bind_addr, addr);
        assert_eq!(config.max_connections, 50);
        assert!(!config.tcp_nodelay);
    }
}
