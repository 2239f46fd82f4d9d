//! Server configuration.

use std::time::Duration;

use crate::{domain::DEFAULT_HISTORY_CAPACITY, infrastructure::broadcast::DEFAULT_SEND_TIMEOUT};

/// Outbound queue size per WebSocket connection.
pub const DEFAULT_OUTBOUND_BUFFER: usize = 64;

/// Tunables for the server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind to (e.g., "127.0.0.1")
    pub host: String,
    /// Port number to bind to (e.g., 8080)
    pub port: u16,
    /// Upper bound for one broadcast delivery to one connection
    pub send_timeout: Duration,
    /// Retention cap for each room's message history
    pub history_capacity: usize,
    /// Outbound queue size per WebSocket connection
    pub outbound_buffer: usize,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            send_timeout: DEFAULT_SEND_TIMEOUT,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
        }
    }
}
