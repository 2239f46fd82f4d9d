//! 接続レジストリ
//!
//! ## 責務
//!
//! - 接続中の `Connection` を `ConnectionId` で管理する
//! - ブロードキャスト用のスナップショットを提供する
//!
//! メッセージ内容は一切保持しない。

use std::sync::Arc;

use dashmap::DashMap;

use crate::domain::{Connection, ConnectionId};

/// Live outbound connections keyed by registry-issued id.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: DashMap<ConnectionId, Arc<dyn Connection>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a connection under a fresh id.
    pub fn register(&self, connection: Arc<dyn Connection>) -> ConnectionId {
        let connection_id = ConnectionId::generate();
        self.connections.insert(connection_id, connection);
        tracing::debug!("Connection '{}' registered", connection_id);
        connection_id
    }

    /// Remove a connection. Unknown ids are ignored.
    pub fn unregister(&self, connection_id: &ConnectionId) {
        if self.connections.remove(connection_id).is_some() {
            tracing::debug!("Connection '{}' unregistered", connection_id);
        }
    }

    /// Number of registered connections; approximate while others mutate.
    pub fn count(&self) -> usize {
        self.connections.len()
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.connections.contains_key(connection_id)
    }

    /// Point-in-time copy of the registered connections.
    pub fn snapshot(&self) -> Vec<(ConnectionId, Arc<dyn Connection>)> {
        self.connections
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect()
    }

    /// Drop every entry, returning what was registered.
    pub(crate) fn drain(&self) -> Vec<(ConnectionId, Arc<dyn Connection>)> {
        let drained = self.snapshot();
        for (connection_id, _) in &drained {
            self.connections.remove(connection_id);
        }
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::connection::MockConnection;

    #[test]
    fn test_register_issues_unique_ids() {
        // テスト項目: 登録のたびに異なる ID が払い出される
        // given (前提条件):
        let registry = ConnectionRegistry::new();

        // when (操作):
        let first = registry.register(Arc::new(MockConnection::new()));
        let second = registry.register(Arc::new(MockConnection::new()));

        // then (期待する結果):
        assert_ne!(first, second);
        assert_eq!(registry.count(), 2);
        assert!(registry.contains(&first));
        assert!(registry.contains(&second));
    }

    #[test]
    fn test_unregister_is_idempotent() {
        // テスト項目: 同じ ID を複数回削除してもエラーにならない
        // given (前提条件):
        let registry = ConnectionRegistry::new();
        let connection_id = registry.register(Arc::new(MockConnection::new()));

        // when (操作):
        registry.unregister(&connection_id);
        registry.unregister(&connection_id);
        registry.unregister(&ConnectionId::generate());

        // then (期待する結果):
        assert_eq!(registry.count(), 0);
        assert!(!registry.contains(&connection_id));
    }

    #[test]
    fn test_snapshot_is_detached_from_later_changes() {
        // テスト項目: スナップショット取得後の登録・削除はスナップショットに影響しない
        // given (前提条件):
        let registry = ConnectionRegistry::new();
        let first = registry.register(Arc::new(MockConnection::new()));

        // when (操作):
        let snapshot = registry.snapshot();
        registry.unregister(&first);
        registry.register(Arc::new(MockConnection::new()));

        // then (期待する結果):
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].0, first);
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_drain_empties_registry() {
        // テスト項目: drain で全ての接続が取り出され、レジストリは空になる
        // given (前提条件):
        let registry = ConnectionRegistry::new();
        registry.register(Arc::new(MockConnection::new()));
        registry.register(Arc::new(MockConnection::new()));

        // when (操作):
        let drained = registry.drain();

        // then (期待する結果):
        assert_eq!(drained.len(), 2);
        assert_eq!(registry.count(), 0);
    }
}
