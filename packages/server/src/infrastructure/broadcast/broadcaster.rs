//! イベントブロードキャスタ
//!
//! ## 責務
//!
//! - `GameEvent` を一度だけシリアライズし、登録済みの全接続へ並行に送信する
//! - 送信に失敗した接続（クローズ済み・送信エラー・タイムアウト）をレジストリから削除する
//! - 診断用の購読者へ通知する
//!
//! ブロードキャストの呼び出し自体は失敗しない（fire-and-forget）。

use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use futures_util::future::join_all;
use tokio::sync::mpsc;

use crate::domain::{Connection, ConnectionId, GameEvent};

use super::registry::ConnectionRegistry;

/// Upper bound for a single delivery attempt.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(2);

/// Upper bound for closing one connection during shutdown.
pub const SHUTDOWN_CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

const SHUTDOWN_REASON: &str = "Server shutting down";

/// Why a connection was dropped from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    NotOpen,
    SendFailed(String),
    TimedOut,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::NotOpen => f.write_str("connection not open"),
            DropReason::SendFailed(e) => write!(f, "{}", e),
            DropReason::TimedOut => f.write_str("send timed out"),
        }
    }
}

/// Diagnostics published to broadcaster subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastNotice {
    /// A recipient failed and was removed from the registry
    ConnectionDropped {
        connection_id: ConnectionId,
        reason: DropReason,
    },
    /// One broadcast finished
    Completed { recipients: usize, dropped: usize },
}

/// Fans events out to every registered connection.
pub struct EventBroadcaster {
    registry: Arc<ConnectionRegistry>,
    send_timeout: Duration,
    observers: Mutex<Vec<mpsc::UnboundedSender<BroadcastNotice>>>,
}

impl EventBroadcaster {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self::with_send_timeout(registry, DEFAULT_SEND_TIMEOUT)
    }

    pub fn with_send_timeout(registry: Arc<ConnectionRegistry>, send_timeout: Duration) -> Self {
        Self {
            registry,
            send_timeout,
            observers: Mutex::new(Vec::new()),
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Subscribe to delivery diagnostics.
    ///
    /// Dropping the receiver unsubscribes on the next notice.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<BroadcastNotice> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Broadcast an event to every connection except `exclude`.
    ///
    /// Returns once every delivery attempt has finished or timed out; failed
    /// recipients are already unregistered by then.
    pub async fn broadcast(&self, event: &GameEvent, exclude: Option<ConnectionId>) {
        let frame: Arc<str> = match serde_json::to_string(event) {
            Ok(json) => json.into(),
            Err(e) => {
                tracing::error!(
                    "Failed to serialize '{}' event, skipping broadcast: {}",
                    event.event_type,
                    e
                );
                return;
            }
        };
        self.broadcast_frame(frame, exclude).await;
    }

    /// Broadcast an already-serialized frame.
    pub async fn broadcast_frame(&self, frame: Arc<str>, exclude: Option<ConnectionId>) {
        let targets: Vec<(ConnectionId, Arc<dyn Connection>)> = self
            .registry
            .snapshot()
            .into_iter()
            .filter(|(connection_id, _)| Some(*connection_id) != exclude)
            .collect();
        let recipients = targets.len();

        let deliveries = targets.into_iter().map(|(connection_id, connection)| {
            let frame = Arc::clone(&frame);
            async move { (connection_id, self.deliver(connection.as_ref(), frame).await) }
        });
        let outcomes = join_all(deliveries).await;

        let mut dropped = 0;
        for (connection_id, outcome) in outcomes {
            if let Err(reason) = outcome {
                dropped += 1;
                self.registry.unregister(&connection_id);
                tracing::warn!(
                    "Dropped connection '{}' during broadcast: {}",
                    connection_id,
                    reason
                );
                self.notify(BroadcastNotice::ConnectionDropped {
                    connection_id,
                    reason,
                });
            }
        }

        tracing::debug!(
            "Broadcast delivered to {} of {} connections",
            recipients - dropped,
            recipients
        );
        self.notify(BroadcastNotice::Completed {
            recipients,
            dropped,
        });
    }

    /// Close every registered connection and empty the registry.
    pub async fn shutdown(&self) {
        let connections = self.registry.drain();
        let count = connections.len();

        let closing = connections.iter().map(|(connection_id, connection)| async move {
            if !connection.is_open() {
                return;
            }
            let closed = tokio::time::timeout(
                SHUTDOWN_CLOSE_TIMEOUT,
                connection.close(SHUTDOWN_REASON),
            )
            .await;
            if closed.is_err() {
                tracing::warn!("Timed out closing connection '{}'", connection_id);
            }
        });
        join_all(closing).await;

        tracing::info!("Closed {} connections", count);
    }

    async fn deliver(&self, connection: &dyn Connection, frame: Arc<str>) -> Result<(), DropReason> {
        if !connection.is_open() {
            return Err(DropReason::NotOpen);
        }
        match tokio::time::timeout(self.send_timeout, connection.send(frame)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(DropReason::SendFailed(e.to_string())),
            Err(_) => Err(DropReason::TimedOut),
        }
    }

    fn notify(&self, notice: BroadcastNotice) {
        let mut observers = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        observers.retain(|observer| observer.send(notice.clone()).is_ok());
    }
}
