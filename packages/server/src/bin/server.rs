//! Stagecast server: broadcasts scene events over WebSocket and hosts
//! per-scene chat rooms.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin stagecast-server
//! cargo run --bin stagecast-server -- --host 0.0.0.0 --port 3000 --send-timeout-ms 500
//! ```

use std::time::Duration;

use clap::Parser;
use stagecast_server::{
    config::ServerConfig,
    ui::{AppState, Server},
};
use stagecast_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "stagecast-server")]
#[command(about = "Real-time scene event broadcaster and chat room server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "STAGECAST_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "STAGECAST_PORT", default_value = "8080")]
    port: u16,

    /// Per-connection broadcast timeout in milliseconds
    #[arg(long, env = "STAGECAST_SEND_TIMEOUT_MS", default_value = "2000")]
    send_timeout_ms: u64,

    /// Number of messages kept per chat room
    #[arg(long, env = "STAGECAST_HISTORY_CAPACITY", default_value = "200")]
    history_capacity: usize,

    /// Outbound queue size per WebSocket connection
    #[arg(long, env = "STAGECAST_OUTBOUND_BUFFER", default_value = "64")]
    outbound_buffer: usize,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "STAGECAST_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl From<&Args> for ServerConfig {
    fn from(args: &Args) -> Self {
        Self {
            host: args.host.clone(),
            port: args.port,
            send_timeout: Duration::from_millis(args.send_timeout_ms),
            history_capacity: args.history_capacity,
            outbound_buffer: args.outbound_buffer,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = ServerConfig::from(&args);
    tracing::debug!("Starting with {:?}", config);

    let state = AppState::in_memory(&config);
    let server = Server::new(state);
    if let Err(e) = server.run(&config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
