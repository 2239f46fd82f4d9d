//! Outbound connection abstraction.
//!
//! The networking layer owns the transport; the core only needs to push an
//! already-serialized frame and ask whether the peer is still there.

use std::sync::Arc;

use async_trait::async_trait;

use super::error::ConnectionError;

/// An open, write-capable channel to one subscriber.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Connection: Send + Sync {
    /// Whether the connection is still open. Queried lazily at send time.
    fn is_open(&self) -> bool;

    /// Push one text frame to the peer.
    async fn send(&self, frame: Arc<str>) -> Result<(), ConnectionError>;

    /// Ask the peer to close. Best-effort.
    async fn close(&self, reason: &str);
}
