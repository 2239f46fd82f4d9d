//! Graceful shutdown signal handling.

use std::sync::Arc;

use crate::infrastructure::broadcast::EventBroadcaster;

/// Wait for Ctrl+C or SIGTERM, then close every WebSocket connection.
///
/// Upgraded connections are not tracked by axum's graceful shutdown, so they
/// are closed here before the listener stops.
pub async fn shutdown_signal(broadcaster: Arc<EventBroadcaster>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }

    broadcaster.shutdown().await;
}
