//! Server configuration.

/// Configuration for the session server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Maximum messages returned by one relay fetch.
    pub max_fetch_batch: usize,
    /// Relay fetch size when the request names no limit.
    pub default_fetch_batch: usize,
    /// Heartbeat age beyond which a presence row reads as stale.
    pub presence_ttl_ms: u64,
}

impl ServerConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_fetch_batch: 100,
            default_fetch_batch: 50,
            presence_ttl_ms: 30_000,
        }
    }

    /// Sets the maximum relay fetch batch size.
    #[must_use]
    pub fn with_max_fetch_batch(mut self, size: usize) -> Self {
        self.max_fetch_batch = size;
        self
    }

    /// Sets the default relay fetch batch size.
    #[must_use]
    pub fn with_default_fetch_batch(mut self, size: usize) -> Self {
        self.default_fetch_batch = size;
        self
    }

    /// Sets the presence staleness threshold in milliseconds.
    #[must_use]
    pub fn with_presence_ttl_ms(mut self, ttl_ms: u64) -> Self {
        self.presence_ttl_ms = ttl_ms;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}
