//! チャンネルを使った Connection 実装
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は有界チャンネルの送信側だけを持ち、受信側は UI 層の
//! pusher ループが WebSocket へ書き出します。
//!
//! - UI 層: WebSocket 接続の受付、チャンネルの生成、フレームの書き出し
//! - Infrastructure 層: フレームのキューイング

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::{Connection, ConnectionError};

/// A frame queued for one WebSocket peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    Text(Arc<str>),
    Close(String),
}

/// `Connection` backed by a bounded mpsc queue.
///
/// A full queue makes `send` wait, so a stalled peer is eventually caught by
/// the broadcaster's per-connection timeout.
pub struct ChannelConnection {
    sender: mpsc::Sender<OutboundFrame>,
}

impl ChannelConnection {
    /// Create a connection and the receiver the transport drains.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<OutboundFrame>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl Connection for ChannelConnection {
    fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }

    async fn send(&self, frame: Arc<str>) -> Result<(), ConnectionError> {
        self.sender
            .send(OutboundFrame::Text(frame))
            .await
            .map_err(|_| ConnectionError::Closed)
    }

    async fn close(&self, reason: &str) {
        // 受信側が既に閉じていれば送れなくても問題ない
        let _ = self.sender.send(OutboundFrame::Close(reason.to_string())).await;
    }
}
