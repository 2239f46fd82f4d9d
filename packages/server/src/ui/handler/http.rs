//! HTTP API endpoint handlers.
//!
//! Thin glue over the use cases: path/body extraction, status codes and
//! relaying chat messages as events.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    domain::{ChatMessage, ChatRoom, DEFAULT_MESSAGE_LIMIT, GameEvent, RoomId, SceneId, UserId},
    infrastructure::dto::http::{
        CreateRoomRequest, ErrorDto, HealthDto, MessagesQuery, ParticipantsDto,
        PublishEventRequest, SendMessageRequest,
    },
    ui::state::AppState,
    usecase::{CreateRoomError, EventDraft, SendMessageError},
};

type ApiError = (StatusCode, Json<ErrorDto>);

fn api_error(status: StatusCode, error: impl ToString) -> ApiError {
    (status, Json(ErrorDto::new(error)))
}

fn room_not_found(room_id: &RoomId) -> ApiError {
    api_error(
        StatusCode::NOT_FOUND,
        format!("Chat room not found: {}", room_id),
    )
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
        connections: state.broadcaster.registry().count(),
    })
}

/// Build a game event and broadcast it to every WebSocket subscriber
pub async fn publish_event(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PublishEventRequest>,
) -> (StatusCode, Json<GameEvent>) {
    let draft = EventDraft {
        event_type: request.event_type,
        scene_id: request.scene_id,
        entity_id: request.entity_id,
        data: request.data,
        actor: request.actor,
    };
    let event = state
        .publish_event
        .execute(draft, request.exclude_connection_id)
        .await;
    (StatusCode::ACCEPTED, Json(event))
}

/// Create a chat room for a scene
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<ChatRoom>), ApiError> {
    match state
        .chat_rooms
        .create_room(request.scene_id, request.name, request.created_by)
        .await
    {
        Ok(room) => Ok((StatusCode::CREATED, Json(room))),
        Err(e @ CreateRoomError::RoomIdCollision(_)) => {
            tracing::warn!("{}", e);
            Err(api_error(StatusCode::CONFLICT, e))
        }
        Err(e @ CreateRoomError::Repository(_)) => {
            tracing::error!("{}", e);
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e))
        }
    }
}

/// Get a room by id (closed rooms included)
pub async fn get_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<RoomId>,
) -> Result<Json<ChatRoom>, ApiError> {
    state
        .chat_rooms
        .get_room(&room_id)
        .await
        .map(Json)
        .ok_or_else(|| room_not_found(&room_id))
}

/// Close a room
pub async fn close_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<RoomId>,
) -> Result<StatusCode, ApiError> {
    if state.chat_rooms.close_room(&room_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(room_not_found(&room_id))
    }
}

/// Get the most recent messages of a room, oldest first
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<RoomId>,
    Query(query): Query<MessagesQuery>,
) -> Json<Vec<ChatMessage>> {
    let limit = query.limit.unwrap_or(DEFAULT_MESSAGE_LIMIT);
    Json(state.chat_rooms.get_messages(&room_id, limit).await)
}

/// Post a message to a room and relay it as a `chat.message` event
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<RoomId>,
    Json(request): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessage>), ApiError> {
    let Some(room) = state.chat_rooms.get_room(&room_id).await else {
        return Err(room_not_found(&room_id));
    };

    let message = state
        .chat_rooms
        .send_message(&room_id, request.user_id, request.username, request.content)
        .await
        .map_err(|e| match e {
            SendMessageError::RoomNotFound(_) => api_error(StatusCode::NOT_FOUND, e),
            SendMessageError::Repository(_) => {
                tracing::error!("{}", e);
                api_error(StatusCode::INTERNAL_SERVER_ERROR, e)
            }
        })?;

    state
        .publish_event
        .publish_chat_message(&room.scene_id, &message)
        .await;

    Ok((StatusCode::CREATED, Json(message)))
}

/// List the participants of a room
pub async fn get_participants(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<RoomId>,
) -> Json<ParticipantsDto> {
    let participants = state.chat_rooms.get_participants(&room_id).await;
    Json(ParticipantsDto {
        room_id: room_id.into_string(),
        participants: participants.into_iter().map(UserId::into_string).collect(),
    })
}

/// Join a room
pub async fn join_room(
    State(state): State<Arc<AppState>>,
    Path((room_id, user_id)): Path<(RoomId, UserId)>,
) -> Result<StatusCode, ApiError> {
    if state.chat_rooms.join_room(&room_id, user_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(room_not_found(&room_id))
    }
}

/// Leave a room
pub async fn leave_room(
    State(state): State<Arc<AppState>>,
    Path((room_id, user_id)): Path<(RoomId, UserId)>,
) -> Result<StatusCode, ApiError> {
    if state.chat_rooms.leave_room(&room_id, &user_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(api_error(
            StatusCode::NOT_FOUND,
            format!("'{}' is not a participant of '{}'", user_id, room_id),
        ))
    }
}

/// List the active rooms of a scene, newest first
pub async fn get_rooms_for_scene(
    State(state): State<Arc<AppState>>,
    Path(scene_id): Path<SceneId>,
) -> impl IntoResponse {
    Json(state.chat_rooms.get_rooms_for_scene(&scene_id).await)
}
