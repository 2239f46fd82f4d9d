//! InMemory Participant Repository 実装
//!
//! ルームごとの参加者集合を保持します。ルームごとに独立したロックを持ちます。

use std::{collections::BTreeSet, sync::Arc};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::domain::{ParticipantRepository, RoomId, UserId};

type ParticipantSet = Arc<Mutex<BTreeSet<UserId>>>;

/// インメモリ Participant Repository 実装
#[derive(Default)]
pub struct InMemoryParticipantRepository {
    rooms: DashMap<RoomId, ParticipantSet>,
}

impl InMemoryParticipantRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self, room_id: &RoomId) -> Option<ParticipantSet> {
        self.rooms.get(room_id).map(|entry| Arc::clone(entry.value()))
    }
}

#[async_trait]
impl ParticipantRepository for InMemoryParticipantRepository {
    async fn open_room(&self, room_id: &RoomId) {
        self.rooms.entry(room_id.clone()).or_default();
    }

    async fn join(&self, room_id: &RoomId, user_id: UserId) -> bool {
        match self.set(room_id) {
            Some(set) => {
                set.lock().await.insert(user_id);
                true
            }
            None => false,
        }
    }

    async fn leave(&self, room_id: &RoomId, user_id: &UserId) -> bool {
        match self.set(room_id) {
            Some(set) => set.lock().await.remove(user_id),
            None => false,
        }
    }

    async fn participants(&self, room_id: &RoomId) -> BTreeSet<UserId> {
        match self.set(room_id) {
            Some(set) => set.lock().await.clone(),
            None => BTreeSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room_id() -> RoomId {
        RoomId::new("game_scene-1_abc").unwrap()
    }

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[tokio::test]
    async fn test_join_unopened_room_fails() {
        // テスト項目: 参加者集合が無いルームには参加できない
        // given (前提条件):
        let repo = InMemoryParticipantRepository::new();

        // when (操作):
        let joined = repo.join(&room_id(), user("u1")).await;

        // then (期待する結果):
        assert!(!joined);
        assert!(repo.participants(&room_id()).await.is_empty());
    }

    #[tokio::test]
    async fn test_join_is_idempotent() {
        // テスト項目: 同じユーザーが複数回参加しても 1 人として扱われる
        // given (前提条件):
        let repo = InMemoryParticipantRepository::new();
        repo.open_room(&room_id()).await;

        // when (操作):
        assert!(repo.join(&room_id(), user("u1")).await);
        assert!(repo.join(&room_id(), user("u1")).await);

        // then (期待する結果):
        assert_eq!(
            repo.participants(&room_id()).await,
            BTreeSet::from([user("u1")])
        );
    }

    #[tokio::test]
    async fn test_leave_reports_actual_removal() {
        // テスト項目: 実際に削除した場合のみ true が返される
        // given (前提条件):
        let repo = InMemoryParticipantRepository::new();
        repo.open_room(&room_id()).await;
        repo.join(&room_id(), user("u1")).await;

        // when (操作):
        let first = repo.leave(&room_id(), &user("u1")).await;
        let second = repo.leave(&room_id(), &user("u1")).await;
        let never_joined = repo.leave(&room_id(), &user("u2")).await;

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert!(!never_joined);
        assert!(repo.participants(&room_id()).await.is_empty());
    }

    #[tokio::test]
    async fn test_open_room_keeps_existing_members() {
        // テスト項目: 既存のルームを再度 open しても参加者は消えない
        // given (前提条件):
        let repo = InMemoryParticipantRepository::new();
        repo.open_room(&room_id()).await;
        repo.join(&room_id(), user("u1")).await;

        // when (操作):
        repo.open_room(&room_id()).await;

        // then (期待する結果):
        assert_eq!(repo.participants(&room_id()).await.len(), 1);
    }
}
