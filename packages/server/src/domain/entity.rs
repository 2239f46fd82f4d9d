//! Entities and records of the broadcasting core.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::value_object::{EventType, MessageId, RoomId, SceneId, UserId};

/// Retention cap applied to every room's message history.
pub const DEFAULT_HISTORY_CAPACITY: usize = 200;

/// Number of messages returned by `GetMessages` when no limit is given.
pub const DEFAULT_MESSAGE_LIMIT: usize = 50;

/// Well-known game event tags.
pub mod event_types {
    pub const SCENE_CREATED: &str = "scene.created";
    pub const SCENE_UPDATED: &str = "scene.updated";
    pub const SCENE_DELETED: &str = "scene.deleted";

    pub const ENTITY_CREATED: &str = "entity.created";
    pub const ENTITY_UPDATED: &str = "entity.updated";
    pub const ENTITY_DELETED: &str = "entity.deleted";

    pub const WORLD_GENERATED: &str = "world.Generated";
    pub const ASSET_STREAMED: &str = "asset.streamed";

    /// A chat message relayed to every subscriber.
    pub const CHAT_MESSAGE: &str = "chat.message";
}

/// A server-generated event pushed to every subscriber.
///
/// Built right before broadcast and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GameEvent {
    pub event_type: EventType,
    pub scene_id: String,
    pub entity_id: String,
    pub data: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
    /// Who triggered the event
    pub actor: String,
}

/// A chat room tied to a game scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChatRoom {
    pub id: RoomId,
    pub scene_id: SceneId,
    pub name: String,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

impl ChatRoom {
    /// Create a new, active room with a freshly generated id.
    pub fn open(
        scene_id: SceneId,
        name: String,
        created_by: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RoomId::generate(&scene_id),
            scene_id,
            name,
            created_by,
            created_at,
            is_active: true,
        }
    }
}

/// A message posted to a chat room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChatMessage {
    pub id: MessageId,
    pub room_id: RoomId,
    pub user_id: UserId,
    pub username: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Bounded, insertion-ordered message history of one room.
///
/// Pushing past the capacity evicts the oldest message.
#[derive(Debug, Clone)]
pub struct MessageHistory {
    messages: VecDeque<ChatMessage>,
    capacity: usize,
}

impl MessageHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a message, returning the evicted one if the cap was exceeded.
    pub fn push(&mut self, message: ChatMessage) -> Option<ChatMessage> {
        self.messages.push_back(message);
        if self.messages.len() > self.capacity {
            self.messages.pop_front()
        } else {
            None
        }
    }

    /// The `limit` most recent messages, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<ChatMessage> {
        let skip = self.messages.len().saturating_sub(limit);
        self.messages.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for MessageHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(room_id: &RoomId, content: &str) -> ChatMessage {
        ChatMessage {
            id: MessageId::generate(),
            room_id: room_id.clone(),
            user_id: UserId::new("u1").unwrap(),
            username: "Alice".to_string(),
            content: content.to_string(),
            timestamp: Utc::now(),
        }
    }

    fn room_id() -> RoomId {
        RoomId::generate(&SceneId::new("scene-1").unwrap())
    }

    #[test]
    fn test_history_evicts_oldest_when_full() {
        // テスト項目: 容量を超えると最も古いメッセージが削除される
        // given (前提条件):
        let room_id = room_id();
        let mut history = MessageHistory::with_capacity(2);
        history.push(message(&room_id, "first"));
        history.push(message(&room_id, "second"));

        // when (操作):
        let evicted = history.push(message(&room_id, "third"));

        // then (期待する結果):
        assert_eq!(evicted.map(|m| m.content), Some("first".to_string()));
        let contents: Vec<String> = history.recent(10).into_iter().map(|m| m.content).collect();
        assert_eq!(contents, vec!["second", "third"]);
    }

    #[test]
    fn test_history_recent_returns_tail_in_order() {
        // テスト項目: recent は直近 N 件を古い順に返す
        // given (前提条件):
        let room_id = room_id();
        let mut history = MessageHistory::new();
        for i in 0..5 {
            history.push(message(&room_id, &format!("m{i}")));
        }

        // when (操作):
        let recent = history.recent(3);

        // then (期待する結果):
        let contents: Vec<String> = recent.into_iter().map(|m| m.content).collect();
        assert_eq!(contents, vec!["m2", "m3", "m4"]);
        assert!(history.recent(0).is_empty());
    }

    #[test]
    fn test_history_zero_capacity_keeps_one() {
        // テスト項目: 容量 0 を指定しても 1 件は保持される
        // given (前提条件):
        let room_id = room_id();
        let mut history = MessageHistory::with_capacity(0);

        // when (操作):
        history.push(message(&room_id, "a"));
        history.push(message(&room_id, "b"));

        // then (期待する結果):
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.len(), 1);
        assert_eq!(history.recent(1)[0].content, "b");
    }

    #[test]
    fn test_game_event_serializes_pascal_case() {
        // テスト項目: GameEvent が PascalCase のキーでシリアライズされる
        // given (前提条件):
        let event = GameEvent {
            event_type: EventType::new(event_types::ENTITY_UPDATED).unwrap(),
            scene_id: "scene-1".to_string(),
            entity_id: "tree-7".to_string(),
            data: Some(serde_json::json!({"x": 1})),
            timestamp: Utc::now(),
            actor: "alice".to_string(),
        };

        // when (操作):
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        // then (期待する結果):
        assert_eq!(json["EventType"], "entity.updated");
        assert_eq!(json["SceneId"], "scene-1");
        assert_eq!(json["EntityId"], "tree-7");
        assert_eq!(json["Data"]["x"], 1);
        assert_eq!(json["Actor"], "alice");
        assert!(json["Timestamp"].is_string());
    }

    #[test]
    fn test_chat_message_id_uses_simple_form() {
        // テスト項目: ChatMessage の Id がハイフンなしの 32 文字で出力される
        // given (前提条件):
        let message = message(&room_id(), "hi");

        // when (操作):
        let json: serde_json::Value = serde_json::to_value(&message).unwrap();

        // then (期待する結果):
        let wire = json["Id"].as_str().unwrap();
        assert!(!wire.contains('-'));
        assert_eq!(wire.len(), 32);
        assert_eq!(wire, message.id.to_string());
    }

    #[test]
    fn test_world_generated_tag_casing() {
        // テスト項目: world.Generated タグが既存クライアントと同じ表記になる
        // when (操作):
        let tag = EventType::new(event_types::WORLD_GENERATED).unwrap();

        // then (期待する結果):
        assert_eq!(tag.as_str(), "world.Generated");
    }
}
