//! Real-time scene event broadcaster and chat room server.
//!
//! The core keeps a registry of live WebSocket connections that server-side
//! game events are fanned out to, and an in-memory chat room store with
//! bounded per-room history and room membership.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
