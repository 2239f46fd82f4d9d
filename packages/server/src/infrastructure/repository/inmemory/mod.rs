//! インメモリ Repository 実装

pub mod chat_room;
pub mod participant;

pub use chat_room::InMemoryChatRoomRepository;
pub use participant::InMemoryParticipantRepository;
