//! リアルタイム配信の実装
//!
//! - `registry`: 接続中の `Connection` の管理
//! - `broadcaster`: `GameEvent` の全接続への配信
//! - `channel`: WebSocket 用のチャンネル実装

pub mod broadcaster;
pub mod channel;
pub mod registry;

pub use broadcaster::{BroadcastNotice, DEFAULT_SEND_TIMEOUT, DropReason, EventBroadcaster};
pub use channel::{ChannelConnection, OutboundFrame};
pub use registry::ConnectionRegistry;
