//! WebSocket connection handler.
//!
//! Each upgraded socket is registered with the connection registry as a
//! `ChannelConnection` and unregistered when the peer goes away. Events flow
//! one way (server to client); inbound text frames are ignored.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::ConnectionId,
    infrastructure::broadcast::{ChannelConnection, OutboundFrame},
    ui::state::AppState,
};

/// Tag of the first frame sent to every client.
pub const CONNECTION_REGISTERED: &str = "connection.registered";

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains the outbound queue into the WebSocket sink.
///
/// Ends when the queue closes, a close frame is requested, or the socket
/// rejects a write.
fn pusher_loop(
    mut rx: mpsc::Receiver<OutboundFrame>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            match frame {
                OutboundFrame::Text(text) => {
                    if sender.send(Message::Text(text.to_string().into())).await.is_err() {
                        break;
                    }
                }
                OutboundFrame::Close(reason) => {
                    let close = CloseFrame {
                        code: close_code::AWAY,
                        reason: reason.into(),
                    };
                    let _ = sender.send(Message::Close(Some(close))).await;
                    break;
                }
            }
        }
    })
}

fn registered_frame(connection_id: &ConnectionId) -> String {
    serde_json::json!({
        "EventType": CONNECTION_REGISTERED,
        "ConnectionId": connection_id,
    })
    .to_string()
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let (connection, rx) = ChannelConnection::channel(state.outbound_buffer);
    let registry = state.broadcaster.registry().clone();
    let connection_id = registry.register(Arc::new(connection));
    tracing::info!(
        "Connection '{}' opened ({} connected)",
        connection_id,
        registry.count()
    );

    // Tell the client its id so it can exclude itself from its own events
    if let Err(e) = sender
        .send(Message::Text(registered_frame(&connection_id).into()))
        .await
    {
        tracing::warn!("Failed to greet connection '{}': {}", connection_id, e);
        registry.unregister(&connection_id);
        return;
    }

    let mut send_task = pusher_loop(rx, sender);

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                Ok(Message::Text(text)) => {
                    tracing::debug!(
                        "Ignoring inbound text from '{}' ({} bytes)",
                        connection_id,
                        text.len()
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    registry.unregister(&connection_id);
    tracing::info!(
        "Connection '{}' closed ({} connected)",
        connection_id,
        registry.count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_frame_carries_connection_id() {
        // テスト項目: 最初のフレームに接続 ID が含まれる
        // given (前提条件):
        let connection_id = ConnectionId::generate();

        // when (操作):
        let frame: serde_json::Value =
            serde_json::from_str(&registered_frame(&connection_id)).unwrap();

        // then (期待する結果):
        assert_eq!(frame["EventType"], CONNECTION_REGISTERED);
        assert_eq!(frame["ConnectionId"], connection_id.to_string());
    }
}
