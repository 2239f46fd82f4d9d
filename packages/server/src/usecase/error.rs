//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::RepositoryError;

/// Errors from `ChatRoomFacade::create_room`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateRoomError {
    /// 生成した ID が既存のルームと衝突した（再試行可能）
    #[error("Failed to create in-game chat room: id '{0}' is already taken")]
    RoomIdCollision(String),

    #[error("Failed to create in-game chat room: {0}")]
    Repository(RepositoryError),
}

/// Errors from `ChatRoomFacade::send_message`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("Chat room not found: {0}")]
    RoomNotFound(String),

    #[error("Failed to send message: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for CreateRoomError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::RoomIdCollision(id) => CreateRoomError::RoomIdCollision(id),
            other => CreateRoomError::Repository(other),
        }
    }
}

impl From<RepositoryError> for SendMessageError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::RoomNotFound(id) => SendMessageError::RoomNotFound(id),
            other => SendMessageError::Repository(other),
        }
    }
}
