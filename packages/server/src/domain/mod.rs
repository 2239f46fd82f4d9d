//! Domain layer: value objects, entities and the seams the core depends on.

pub mod connection;
pub mod entity;
pub mod error;
pub mod repository;
pub mod value_object;

pub use connection::Connection;
pub use entity::{
    ChatMessage, ChatRoom, DEFAULT_HISTORY_CAPACITY, DEFAULT_MESSAGE_LIMIT, GameEvent,
    MessageHistory, event_types,
};
pub use error::{ConnectionError, RepositoryError, ValueObjectError};
pub use repository::{ChatRoomRepository, ParticipantRepository};
pub use value_object::{ConnectionId, EventType, MessageId, RoomId, SceneId, UserId};
