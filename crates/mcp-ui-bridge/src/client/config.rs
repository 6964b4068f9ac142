//! [`ClientConfig`] and the connection lifecycle state it governs.

use std::time::Duration;

/// Configuration for a [`super::McpClient`] session, per §4.D's table.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// `ws://`, `wss://`, `http://`, or `https://` endpoint.
    pub url: String,
    /// Abort the initial connect after this long.
    pub connect_timeout: Duration,
    /// Abort each request after this long.
    pub request_timeout: Duration,
    /// Attempt reconnection on an unexpected transport loss.
    pub auto_reconnect: bool,
    /// Give up reconnecting after this many failed attempts.
    pub max_reconnect_attempts: u32,
    /// Base reconnect delay; doubles each attempt (1s, 2s, 4s, ...).
    pub reconnect_delay: Duration,
    /// Raise the effective log level for this client's spans.
    pub verbose: bool,
}

impl ClientConfig {
    /// A config pointed at `url` with every other field at its default.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            auto_reconnect: true,
            max_reconnect_attempts: 5,
            reconnect_delay: Duration::from_secs(1),
            verbose: false,
        }
    }
}

/// Connection lifecycle state, per §3's state machine:
/// `disconnected → connecting → connected → (error → connecting)*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Error,
}
