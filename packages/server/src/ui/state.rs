//! Server state shared by the handlers.

use std::sync::Arc;

use stagecast_shared::time::{Clock, SystemClock};

use crate::{
    config::ServerConfig,
    infrastructure::{
        broadcast::{ConnectionRegistry, EventBroadcaster},
        repository::{InMemoryChatRoomRepository, InMemoryParticipantRepository},
    },
    usecase::{ChatRoomFacade, PublishEventUseCase},
};

/// Shared application state
pub struct AppState {
    /// ChatRoomFacade（チャットルーム操作）
    pub chat_rooms: Arc<ChatRoomFacade>,
    /// PublishEventUseCase（イベント配信）
    pub publish_event: Arc<PublishEventUseCase>,
    /// EventBroadcaster（接続の登録・シャットダウン）
    pub broadcaster: Arc<EventBroadcaster>,
    /// WebSocket ごとの送信キューの大きさ
    pub outbound_buffer: usize,
}

impl AppState {
    /// Wire the in-memory stores, registry and use cases.
    ///
    /// Dependencies are built in order:
    /// 1. Repositories
    /// 2. Connection registry and broadcaster
    /// 3. UseCases
    pub fn in_memory(config: &ServerConfig) -> Arc<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        // 1. Repositories
        let rooms = Arc::new(InMemoryChatRoomRepository::with_history_capacity(
            config.history_capacity,
        ));
        let participants = Arc::new(InMemoryParticipantRepository::new());

        // 2. Connection registry and broadcaster
        let registry = Arc::new(ConnectionRegistry::new());
        let broadcaster = Arc::new(EventBroadcaster::with_send_timeout(
            registry,
            config.send_timeout,
        ));

        // 3. UseCases
        let chat_rooms = Arc::new(ChatRoomFacade::new(rooms, participants, clock.clone()));
        let publish_event = Arc::new(PublishEventUseCase::new(broadcaster.clone(), clock));

        Arc::new(Self {
            chat_rooms,
            publish_event,
            broadcaster,
            outbound_buffer: config.outbound_buffer,
        })
    }
}
