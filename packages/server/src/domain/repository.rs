//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use std::collections::BTreeSet;

use async_trait::async_trait;

use super::{ChatMessage, ChatRoom, RepositoryError, RoomId, SceneId, UserId};

/// Chat room store
///
/// ルーム本体とメッセージ履歴を保持する。ルームは削除されず、
/// クローズ後も履歴を参照できる。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRoomRepository: Send + Sync {
    /// ルームを登録する（メッセージ履歴も同時に作成される）
    ///
    /// 同じ ID のルームが既に存在する場合は `RoomIdCollision` を返す。
    async fn insert_room(&self, room: ChatRoom) -> Result<(), RepositoryError>;

    /// ルームを取得
    async fn get_room(&self, room_id: &RoomId) -> Option<ChatRoom>;

    /// ルームが存在するか
    async fn contains_room(&self, room_id: &RoomId) -> bool;

    /// メッセージを追加し、容量超過時は最古のメッセージを削除する
    async fn append_message(&self, message: ChatMessage) -> Result<(), RepositoryError>;

    /// 直近 `limit` 件のメッセージを古い順に取得（未知のルームは空）
    async fn recent_messages(&self, room_id: &RoomId, limit: usize) -> Vec<ChatMessage>;

    /// シーンに属するアクティブなルームを新しい順に取得
    async fn active_rooms_for_scene(&self, scene_id: &SceneId) -> Vec<ChatRoom>;

    /// ルームを非アクティブにする（未知のルームは `false`）
    async fn deactivate_room(&self, room_id: &RoomId) -> bool;
}

/// Participant tracker
///
/// ルームごとの参加者集合を保持する。メッセージ履歴とは独立したライフサイクルを持つ。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// ルーム用の空の参加者集合を用意する（既にあれば何もしない）
    async fn open_room(&self, room_id: &RoomId);

    /// 参加者を追加（集合が無ければ `false`）
    async fn join(&self, room_id: &RoomId, user_id: UserId) -> bool;

    /// 参加者を削除（実際に削除した場合のみ `true`）
    async fn leave(&self, room_id: &RoomId, user_id: &UserId) -> bool;

    /// 参加者一覧を取得（未知のルームは空集合）
    async fn participants(&self, room_id: &RoomId) -> BTreeSet<UserId>;
}
