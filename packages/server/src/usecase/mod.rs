//! UseCase 層
//!
//! - `chat_room`: チャットルームの作成・送信・参加・退出・一覧・クローズ
//! - `publish_event`: `GameEvent` の生成と全接続への配信

pub mod chat_room;
pub mod error;
pub mod publish_event;

pub use chat_room::ChatRoomFacade;
pub use error::{CreateRoomError, SendMessageError};
pub use publish_event::{EventDraft, PublishEventUseCase};
