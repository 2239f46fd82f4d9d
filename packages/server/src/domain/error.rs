//! Domain-level error types.

use thiserror::Error;

/// Value object construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// The identifier was empty or whitespace only
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Repository errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The referenced room does not exist
    #[error("Chat room not found: {0}")]
    RoomNotFound(String),

    /// A freshly generated room id is already taken
    #[error("Chat room id already exists: {0}")]
    RoomIdCollision(String),
}

/// Errors reported by a single outbound connection.
///
/// These never escape the broadcaster; they only decide whether a
/// connection is dropped from the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    /// The connection is no longer open
    #[error("connection is closed")]
    Closed,

    /// The transport rejected the frame
    #[error("send failed: {0}")]
    SendFailed(String),
}
