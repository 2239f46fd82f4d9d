//! UseCase: チャットルーム操作
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ChatRoomFacade の各操作（作成・送信・取得・参加・退出・クローズ）
//!
//! ### なぜこのテストが必要か
//! - ルームストアと参加者トラッカーを組み合わせた公開 API の振る舞いを保証する
//! - 未知のルームに対して例外ではなく値で結果を返すことを確認する
//!
//! ### どのような状況を想定しているか
//! - 正常系：ルーム作成からメッセージ送信・参加まで
//! - 異常系：存在しないルーム、ID の衝突
//! - エッジケース：クローズ後の履歴参照、参加直後の退出

use std::{collections::BTreeSet, sync::Arc};

use stagecast_shared::time::Clock;

use crate::domain::{
    ChatMessage, ChatRoom, ChatRoomRepository, MessageId, ParticipantRepository, RoomId, SceneId,
    UserId,
};

use super::error::{CreateRoomError, SendMessageError};

/// チャットルームの公開操作
///
/// ルームストア（メッセージ履歴を含む）と参加者トラッカーを束ねる。
pub struct ChatRoomFacade {
    /// ルームストア
    rooms: Arc<dyn ChatRoomRepository>,
    /// 参加者トラッカー
    participants: Arc<dyn ParticipantRepository>,
    clock: Arc<dyn Clock>,
}

impl ChatRoomFacade {
    /// 新しい ChatRoomFacade を作成
    pub fn new(
        rooms: Arc<dyn ChatRoomRepository>,
        participants: Arc<dyn ParticipantRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            rooms,
            participants,
            clock,
        }
    }

    /// ルームを作成
    ///
    /// 参加者集合を先に用意してからルームを登録するため、ルーム ID が
    /// 見えた時点でメッセージ履歴と参加者集合は必ず存在する。
    ///
    /// # Returns
    ///
    /// * `Ok(ChatRoom)` - 作成されたルーム
    /// * `Err(CreateRoomError::RoomIdCollision)` - ID 衝突（呼び出し側で再試行）
    pub async fn create_room(
        &self,
        scene_id: SceneId,
        name: String,
        created_by: UserId,
    ) -> Result<ChatRoom, CreateRoomError> {
        let room = ChatRoom::open(scene_id, name, created_by, self.clock.now());

        self.participants.open_room(&room.id).await;
        self.rooms.insert_room(room.clone()).await?;

        tracing::info!(
            "In-game chat room '{}' created for scene '{}'",
            room.id,
            room.scene_id
        );
        Ok(room)
    }

    /// メッセージを送信
    ///
    /// 上限を超えた場合は最も古いメッセージが削除される。
    pub async fn send_message(
        &self,
        room_id: &RoomId,
        user_id: UserId,
        username: String,
        content: String,
    ) -> Result<ChatMessage, SendMessageError> {
        let message = ChatMessage {
            id: MessageId::generate(),
            room_id: room_id.clone(),
            user_id,
            username,
            content,
            timestamp: self.clock.now(),
        };

        self.rooms.append_message(message.clone()).await?;

        tracing::debug!("Message '{}' sent to room '{}'", message.id, room_id);
        Ok(message)
    }

    /// 直近 `limit` 件のメッセージを古い順に取得（未知のルームは空）
    pub async fn get_messages(&self, room_id: &RoomId, limit: usize) -> Vec<ChatMessage> {
        self.rooms.recent_messages(room_id, limit).await
    }

    /// シーンのアクティブなルームを新しい順に取得
    pub async fn get_rooms_for_scene(&self, scene_id: &SceneId) -> Vec<ChatRoom> {
        self.rooms.active_rooms_for_scene(scene_id).await
    }

    /// ルームを取得（クローズ済みも含む）
    pub async fn get_room(&self, room_id: &RoomId) -> Option<ChatRoom> {
        self.rooms.get_room(room_id).await
    }

    /// ルームをクローズ（未知のルームは `false`、クローズ済みでも `true`）
    pub async fn close_room(&self, room_id: &RoomId) -> bool {
        let closed = self.rooms.deactivate_room(room_id).await;
        if closed {
            tracing::info!("In-game chat room '{}' closed", room_id);
        }
        closed
    }

    /// ルームに参加（未知のルームは `false`）
    pub async fn join_room(&self, room_id: &RoomId, user_id: UserId) -> bool {
        if !self.rooms.contains_room(room_id).await {
            return false;
        }
        self.participants.join(room_id, user_id).await
    }

    /// ルームから退出（実際に退出した場合のみ `true`）
    pub async fn leave_room(&self, room_id: &RoomId, user_id: &UserId) -> bool {
        self.participants.leave(room_id, user_id).await
    }

    /// 参加者一覧を取得（未知のルームは空集合）
    pub async fn get_participants(&self, room_id: &RoomId) -> BTreeSet<UserId> {
        self.participants.participants(room_id).await
    }
}
