//! HTTP API DTO definitions.
//!
//! Rooms, messages and events are returned as the domain records
//! themselves; only request bodies and small envelopes live here.

use serde::{Deserialize, Serialize};

use crate::domain::{ConnectionId, EventType, SceneId, UserId};

/// Request body for `POST /api/rooms`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoomRequest {
    pub scene_id: SceneId,
    pub name: String,
    pub created_by: UserId,
}

/// Request body for `POST /api/rooms/{room_id}/messages`
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub user_id: UserId,
    pub username: String,
    pub content: String,
}

/// Query parameters for `GET /api/rooms/{room_id}/messages`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagesQuery {
    pub limit: Option<usize>,
}

/// Request body for `POST /api/events`
#[derive(Debug, Clone, Deserialize)]
pub struct PublishEventRequest {
    pub event_type: EventType,
    pub scene_id: String,
    #[serde(default)]
    pub entity_id: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    pub actor: String,
    /// Connection that should not receive its own event
    #[serde(default)]
    pub exclude_connection_id: Option<ConnectionId>,
}

/// Response body for `GET /api/rooms/{room_id}/participants`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantsDto {
    pub room_id: String,
    pub participants: Vec<String>,
}

/// Response body for `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    pub connections: usize,
}

/// Error envelope for non-2xx responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}

impl ErrorDto {
    pub fn new(error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}
