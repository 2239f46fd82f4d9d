//! Request handlers.

pub mod http;
pub mod websocket;

pub use http::{
    close_room, create_room, get_messages, get_participants, get_room, get_rooms_for_scene,
    health_check, join_room, leave_room, publish_event, send_message,
};
pub use websocket::websocket_handler;
