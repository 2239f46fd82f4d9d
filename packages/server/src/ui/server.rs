//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

use super::{
    handler::{
        close_room, create_room, get_messages, get_participants, get_room, get_rooms_for_scene,
        health_check, join_room, leave_room, publish_event, send_message, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket event broadcasting and chat room server
///
/// # Example
///
/// ```ignore
/// let state = AppState::in_memory(&config);
/// Server::new(state).run(&config).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Build the router without binding a listener.
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/events", post(publish_event))
            .route("/api/rooms", post(create_room))
            .route("/api/rooms/{room_id}", get(get_room))
            .route("/api/rooms/{room_id}/close", post(close_room))
            .route(
                "/api/rooms/{room_id}/messages",
                get(get_messages).post(send_message),
            )
            .route("/api/rooms/{room_id}/participants", get(get_participants))
            .route(
                "/api/rooms/{room_id}/participants/{user_id}",
                put(join_room).delete(leave_room),
            )
            .route("/api/scenes/{scene_id}/rooms", get(get_rooms_for_scene))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the server until Ctrl+C / SIGTERM
    ///
    /// Binds to `config.bind_addr()`.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        // Bind the server to the host and port
        let bind_addr = config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!("Stagecast server listening on {}", listener.local_addr()?);
        tracing::info!("Subscribe to events at: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(self.state.broadcaster.clone()))
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
