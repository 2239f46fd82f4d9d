//! UseCase: ゲームイベントの配信
//!
//! プロデューサ（シーン編集やチャット送信を扱うハンドラ）から受け取った内容で
//! `GameEvent` を生成し、ブロードキャスタへ渡す。

use std::sync::Arc;

use serde::Serialize;
use stagecast_shared::time::Clock;

use crate::{
    domain::{ChatMessage, ConnectionId, EventType, GameEvent, SceneId, event_types},
    infrastructure::broadcast::EventBroadcaster,
};

/// Producer-supplied fields of a game event.
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub event_type: EventType,
    pub scene_id: String,
    pub entity_id: String,
    pub data: Option<serde_json::Value>,
    pub actor: String,
}

/// イベント配信のユースケース
pub struct PublishEventUseCase {
    broadcaster: Arc<EventBroadcaster>,
    clock: Arc<dyn Clock>,
}

impl PublishEventUseCase {
    pub fn new(broadcaster: Arc<EventBroadcaster>, clock: Arc<dyn Clock>) -> Self {
        Self { broadcaster, clock }
    }

    /// イベントを生成して配信し、配信したイベントを返す
    ///
    /// 配信の成否は呼び出し側には返らない。
    pub async fn execute(&self, draft: EventDraft, exclude: Option<ConnectionId>) -> GameEvent {
        let event = GameEvent {
            event_type: draft.event_type,
            scene_id: draft.scene_id,
            entity_id: draft.entity_id,
            data: draft.data,
            timestamp: self.clock.now(),
            actor: draft.actor,
        };

        self.broadcaster.broadcast(&event, exclude).await;
        tracing::debug!(
            "Published '{}' event for scene '{}'",
            event.event_type,
            event.scene_id
        );
        event
    }

    /// チャットメッセージを `chat.message` イベントとして配信
    pub async fn publish_chat_message(
        &self,
        scene_id: &SceneId,
        message: &ChatMessage,
    ) -> GameEvent {
        let draft = EventDraft {
            event_type: EventType::well_known(event_types::CHAT_MESSAGE),
            scene_id: scene_id.to_string(),
            entity_id: message.room_id.to_string(),
            data: payload(message, "chat message"),
            actor: message.user_id.to_string(),
        };
        self.execute(draft, None).await
    }
}

/// Convert a payload to JSON; failures are logged and the event carries no data.
fn payload<T: Serialize>(value: &T, what: &str) -> Option<serde_json::Value> {
    match serde_json::to_value(value) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::warn!("Failed to serialize {} payload, sending without data: {}", what, e);
            None
        }
    }
}
