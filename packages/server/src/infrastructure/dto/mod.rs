//! Data Transfer Objects
//!
//! - `http`: HTTP API のリクエスト・レスポンス

pub mod http;
