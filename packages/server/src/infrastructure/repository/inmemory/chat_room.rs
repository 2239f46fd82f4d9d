//! InMemory Chat Room Repository 実装
//!
//! ドメイン層が定義する `ChatRoomRepository` trait の具体的な実装。
//! `DashMap` をインメモリ DB として使用します。
//!
//! ルームごとにメッセージ履歴のロックを持つため、あるルームへの書き込みが
//! 他のルームの操作をブロックすることはありません。

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};
use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, ChatRoom, ChatRoomRepository, DEFAULT_HISTORY_CAPACITY, MessageHistory,
    RepositoryError, RoomId, SceneId,
};

/// Per-room state. Inserted as a whole so a room is never visible without
/// its history.
struct RoomSlot {
    room: ChatRoom,
    active: AtomicBool,
    /// Insertion order, used to break creation-time ties
    sequence: u64,
    history: Mutex<MessageHistory>,
}

impl RoomSlot {
    fn snapshot(&self) -> ChatRoom {
        ChatRoom {
            is_active: self.active.load(Ordering::Acquire),
            ..self.room.clone()
        }
    }
}

/// インメモリ Chat Room Repository 実装
pub struct InMemoryChatRoomRepository {
    rooms: DashMap<RoomId, Arc<RoomSlot>>,
    history_capacity: usize,
    next_sequence: AtomicU64,
}

impl InMemoryChatRoomRepository {
    /// 新しい InMemoryChatRoomRepository を作成（履歴の上限は 200 件）
    pub fn new() -> Self {
        Self::with_history_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// 履歴の上限を指定して作成
    pub fn with_history_capacity(history_capacity: usize) -> Self {
        Self {
            rooms: DashMap::new(),
            history_capacity,
            next_sequence: AtomicU64::new(0),
        }
    }

    fn slot(&self, room_id: &RoomId) -> Option<Arc<RoomSlot>> {
        self.rooms.get(room_id).map(|entry| Arc::clone(entry.value()))
    }
}

impl Default for InMemoryChatRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatRoomRepository for InMemoryChatRoomRepository {
    async fn insert_room(&self, room: ChatRoom) -> Result<(), RepositoryError> {
        match self.rooms.entry(room.id.clone()) {
            Entry::Occupied(_) => Err(RepositoryError::RoomIdCollision(room.id.to_string())),
            Entry::Vacant(entry) => {
                let slot = RoomSlot {
                    active: AtomicBool::new(room.is_active),
                    sequence: self.next_sequence.fetch_add(1, Ordering::Relaxed),
                    history: Mutex::new(MessageHistory::with_capacity(self.history_capacity)),
                    room,
                };
                entry.insert(Arc::new(slot));
                Ok(())
            }
        }
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<ChatRoom> {
        self.slot(room_id).map(|slot| slot.snapshot())
    }

    async fn contains_room(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    async fn append_message(&self, message: ChatMessage) -> Result<(), RepositoryError> {
        let slot = self
            .slot(&message.room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(message.room_id.to_string()))?;

        let mut history = slot.history.lock().await;
        if let Some(evicted) = history.push(message) {
            tracing::debug!(
                "Evicted message '{}' from room '{}'",
                evicted.id,
                evicted.room_id
            );
        }
        Ok(())
    }

    async fn recent_messages(&self, room_id: &RoomId, limit: usize) -> Vec<ChatMessage> {
        match self.slot(room_id) {
            Some(slot) => slot.history.lock().await.recent(limit),
            None => Vec::new(),
        }
    }

    async fn active_rooms_for_scene(&self, scene_id: &SceneId) -> Vec<ChatRoom> {
        let mut rooms: Vec<(u64, ChatRoom)> = self
            .rooms
            .iter()
            .filter(|entry| {
                entry.room.scene_id == *scene_id && entry.active.load(Ordering::Acquire)
            })
            .map(|entry| (entry.sequence, entry.snapshot()))
            .collect();

        rooms.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| seq_b.cmp(seq_a))
        });
        rooms.into_iter().map(|(_, room)| room).collect()
    }

    async fn deactivate_room(&self, room_id: &RoomId) -> bool {
        match self.slot(room_id) {
            Some(slot) => {
                slot.active.store(false, Ordering::Release);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageId, UserId};
    use chrono::{Duration, TimeZone, Utc};
    use std::collections::HashSet;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - ルームの登録・取得・クローズ
    // - メッセージ履歴の上限（FIFO での削除）と同時書き込み時の整合性
    // - シーンごとのアクティブなルーム一覧の並び順
    // ========================================

    fn room(scene: &str, created_at_secs: i64) -> ChatRoom {
        ChatRoom::open(
            SceneId::new(scene).unwrap(),
            "Lobby".to_string(),
            UserId::new("alice").unwrap(),
            Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(created_at_secs),
        )
    }

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

    #[tokio::test]
    async fn test_insert_room_rejects_duplicate_id() {
        // テスト項目: 同じ ID のルームを登録すると衝突エラーになる
        // given (前提条件):
        let repo = InMemoryChatRoomRepository::new();
        let room = room("scene-1", 0);
        repo.insert_room(room.clone()).await.unwrap();

        // when (操作):
        let result = repo.insert_room(room.clone()).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::RoomIdCollision(room.id.to_string()))
        );
    }

    #[tokio::test]
    async fn test_insert_room_creates_empty_history() {
        // テスト項目: 登録直後のルームは空の履歴を持ち、すぐにメッセージを追加できる
        // given (前提条件):
        let repo = InMemoryChatRoomRepository::new();
        let room = room("scene-1", 0);

        // when (操作):
        repo.insert_room(room.clone()).await.unwrap();

        // then (期待する結果):
        assert!(repo.contains_room(&room.id).await);
        assert!(repo.recent_messages(&room.id, 50).await.is_empty());
        assert!(repo.append_message(message(&room.id, "hi")).await.is_ok());
    }

    #[tokio::test]
    async fn test_append_message_to_unknown_room() {
        // テスト項目: 存在しないルームへのメッセージ追加はエラーになる
        // given (前提条件):
        let repo = InMemoryChatRoomRepository::new();
        let unknown = RoomId::new("game_missing_0").unwrap();

        // when (操作):
        let result = repo.append_message(message(&unknown, "hi")).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::RoomNotFound("game_missing_0".to_string()))
        );
        assert!(!repo.contains_room(&unknown).await);
    }

    #[tokio::test]
    async fn test_history_cap_evicts_first_message() {
        // テスト項目: 201 件送信すると最初のメッセージが削除され 200 件が残る
        // given (前提条件):
        let repo = InMemoryChatRoomRepository::new();
        let room = room("scene-1", 0);
        repo.insert_room(room.clone()).await.unwrap();

        // when (操作):
        for i in 0..201 {
            repo.append_message(message(&room.id, &format!("m{i}")))
                .await
                .unwrap();
        }

        // then (期待する結果):
        let messages = repo.recent_messages(&room.id, 201).await;
        assert_eq!(messages.len(), 200);
        assert_eq!(messages[0].content, "m1");
        assert_eq!(messages[199].content, "m200");
        assert!(messages.iter().all(|m| m.content != "m0"));
    }

    #[tokio::test]
    async fn test_concurrent_appends_respect_cap() {
        // テスト項目: 同一ルームへの同時書き込みでも上限が守られ、重複が無い
        // given (前提条件):
        let repo = Arc::new(InMemoryChatRoomRepository::new());
        let room = room("scene-1", 0);
        repo.insert_room(room.clone()).await.unwrap();

        // when (操作): 8 タスクから 40 件ずつ、計 320 件を送信
        let mut handles = Vec::new();
        for task in 0..8 {
            let repo = repo.clone();
            let room_id = room.id.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..40 {
                    repo.append_message(message(&room_id, &format!("t{task}-{i}")))
                        .await
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果):
        let messages = repo.recent_messages(&room.id, 500).await;
        assert_eq!(messages.len(), 200);
        let ids: HashSet<MessageId> = messages.iter().map(|m| m.id).collect();
        assert_eq!(ids.len(), 200);
        let contents: HashSet<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents.len(), 200);
    }

    #[tokio::test]
    async fn test_active_rooms_sorted_newest_first() {
        // テスト項目: シーンのアクティブなルームが作成日時の新しい順で返される
        // given (前提条件):
        let repo = InMemoryChatRoomRepository::new();
        let older = room("scene-1", 0);
        let newer = room("scene-1", 60);
        let other_scene = room("scene-2", 30);
        let closed = room("scene-1", 90);
        for r in [&older, &newer, &other_scene, &closed] {
            repo.insert_room(r.clone()).await.unwrap();
        }
        repo.deactivate_room(&closed.id).await;

        // when (操作):
        let rooms = repo
            .active_rooms_for_scene(&SceneId::new("scene-1").unwrap())
            .await;

        // then (期待する結果):
        let ids: Vec<&RoomId> = rooms.iter().map(|r| &r.id).collect();
        assert_eq!(ids, vec![&newer.id, &older.id]);
    }

    #[tokio::test]
    async fn test_same_timestamp_rooms_ordered_by_creation() {
        // テスト項目: 作成日時が同じ場合は後から登録したルームが先に来る
        // given (前提条件):
        let repo = InMemoryChatRoomRepository::new();
        let first = room("scene-1", 0);
        let second = room("scene-1", 0);
        repo.insert_room(first.clone()).await.unwrap();
        repo.insert_room(second.clone()).await.unwrap();

        // when (操作):
        let rooms = repo
            .active_rooms_for_scene(&SceneId::new("scene-1").unwrap())
            .await;

        // then (期待する結果):
        assert_eq!(rooms[0].id, second.id);
        assert_eq!(rooms[1].id, first.id);
    }

    #[tokio::test]
    async fn test_deactivate_room_keeps_history() {
        // テスト項目: クローズしたルームも取得でき、履歴も残る
        // given (前提条件):
        let repo = InMemoryChatRoomRepository::new();
        let room = room("scene-1", 0);
        repo.insert_room(room.clone()).await.unwrap();
        repo.append_message(message(&room.id, "hi")).await.unwrap();

        // when (操作):
        let first = repo.deactivate_room(&room.id).await;
        let second = repo.deactivate_room(&room.id).await;

        // then (期待する結果):
        assert!(first);
        assert!(second);
        let stored = repo.get_room(&room.id).await.unwrap();
        assert!(!stored.is_active);
        assert_eq!(repo.recent_messages(&room.id, 10).await.len(), 1);
        assert!(
            !repo
                .deactivate_room(&RoomId::new("game_missing_0").unwrap())
                .await
        );
    }
}
