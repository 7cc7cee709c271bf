/**
 * Message Relay
 *
 * Turns a `message` event received on a connection into a stored and,
 * when possible, delivered `MessageRecord`.
 *
 * # Steps
 *
 * 1. Resolve the sender and its peer from the directory. An unregistered
 *    connection is dropped without a reply.
 * 2. Build the record with the current time.
 * 3. Append it to the sender's history, then to the receiver's history.
 *    Both writes are always attempted; a failure is logged and nothing is
 *    rolled back or retried.
 * 4. Push `new_message` to the receiver's live connection, if any.
 *
 * Live delivery is at most once. The stored histories are the durable copy.
 */

use std::sync::Arc;

use uuid::Uuid;

use crate::backend::chat::store::ChatHistoryStore;
use crate::backend::realtime::directory::{ConnectionId, IdentityDirectory};
use crate::shared::{MessageRecord, ServerEvent};

/// What happened to one inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// The connection is not registered; nothing was stored or sent
    Dropped,
    Relayed {
        record: MessageRecord,
        /// Append to the sender's history succeeded
        sender_saved: bool,
        /// Append to the receiver's history succeeded
        receiver_saved: bool,
        /// The record was queued on the receiver's live connection
        pushed: bool,
    },
}

impl RelayOutcome {
    pub fn record(&self) -> Option<&MessageRecord> {
        match self {
            Self::Dropped => None,
            Self::Relayed { record, .. } => Some(record),
        }
    }
}

/// Persists and forwards chat messages
pub struct MessageRelay {
    directory: Arc<IdentityDirectory>,
    store: Arc<dyn ChatHistoryStore>,
}

impl MessageRelay {
    pub fn new(directory: Arc<IdentityDirectory>, store: Arc<dyn ChatHistoryStore>) -> Self {
        Self { directory, store }
    }

    pub fn directory(&self) -> &Arc<IdentityDirectory> {
        &self.directory
    }

    pub fn store(&self) -> &Arc<dyn ChatHistoryStore> {
        &self.store
    }

    /// Relay `content` sent on `connection`
    pub async fn relay(&self, connection: ConnectionId, content: String) -> RelayOutcome {
        let sender = match self.directory.entry_by_socket(connection) {
            Some(entry) => entry,
            None => {
                tracing::debug!("[Relay] Message on unregistered {} dropped", connection);
                return RelayOutcome::Dropped;
            }
        };

        let record = MessageRecord::new(content, sender.user_id, sender.peer_id);

        let sender_saved = self.persist(sender.user_id, &record).await;
        let receiver_saved = self.persist(sender.peer_id, &record).await;

        let pushed = match self.directory.get(sender.peer_id) {
            Some(receiver) => {
                let queued = receiver.connection.push(ServerEvent::NewMessage(record.clone()));
                if !queued {
                    tracing::debug!("[Relay] {} went away before delivery", receiver.connection.id());
                }
                queued
            }
            None => false,
        };

        tracing::debug!(
            "[Relay] {} -> {} (sender_saved={}, receiver_saved={}, pushed={})",
            record.from,
            record.to,
            sender_saved,
            receiver_saved,
            pushed
        );

        RelayOutcome::Relayed {
            record,
            sender_saved,
            receiver_saved,
            pushed,
        }
    }

    async fn persist(&self, user_id: Uuid, record: &MessageRecord) -> bool {
        match self.store.append_chat(user_id, record).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("[Relay] Failed to append chat for user {}: {}", user_id, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::chat::store::{MemoryChatStore, StoreError};
    use crate::backend::realtime::directory::ConnectionHandle;
    use assert_matches::assert_matches;
    use async_trait::async_trait;

    /// Store that refuses writes for one user
    struct FailingFor {
        user: Uuid,
        inner: MemoryChatStore,
    }

    #[async_trait]
    impl ChatHistoryStore for FailingFor {
        async fn append_chat(&self, user_id: Uuid, record: &MessageRecord) -> Result<(), StoreError> {
            if user_id == self.user {
                return Err(StoreError::UserNotFound(user_id));
            }
            self.inner.append_chat(user_id, record).await
        }

        async fn find_chats(&self, user_id: Uuid) -> Result<Vec<MessageRecord>, StoreError> {
            self.inner.find_chats(user_id).await
        }
    }

    fn relay_with(store: Arc<dyn ChatHistoryStore>) -> MessageRelay {
        MessageRelay::new(Arc::new(IdentityDirectory::new()), store)
    }

    #[tokio::test]
    async fn test_unregistered_connection_is_dropped() {
        let store = Arc::new(MemoryChatStore::new());
        let relay = relay_with(store.clone());
        let (h, _rx) = ConnectionHandle::channel();

        let outcome = relay.relay(h.id(), "hello".to_string()).await;

        assert_eq!(outcome, RelayOutcome::Dropped);
    }

    #[tokio::test]
    async fn test_relay_stores_both_sides_and_pushes() {
        let store = Arc::new(MemoryChatStore::new());
        let relay = relay_with(store.clone());
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let (ha, _rxa) = ConnectionHandle::channel();
        let (hb, mut rxb) = ConnectionHandle::channel();
        relay.directory().register(alice, bob, ha.clone());
        relay.directory().register(bob, alice, hb);

        let outcome = relay.relay(ha.id(), "hi".to_string()).await;

        let record = outcome.record().cloned().unwrap();
        assert_eq!((record.content.as_str(), record.from, record.to), ("hi", alice, bob));
        assert_matches!(
            outcome,
            RelayOutcome::Relayed { sender_saved: true, receiver_saved: true, pushed: true, .. }
        );
        assert_eq!(store.find_chats(alice).await.unwrap(), vec![record.clone()]);
        assert_eq!(store.find_chats(bob).await.unwrap(), vec![record.clone()]);
        assert_eq!(rxb.try_recv().unwrap(), ServerEvent::NewMessage(record));
    }

    #[tokio::test]
    async fn test_receiver_failure_still_pushes() {
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let store = Arc::new(FailingFor { user: bob, inner: MemoryChatStore::new() });
        let relay = relay_with(store.clone());
        let (ha, _rxa) = ConnectionHandle::channel();
        let (hb, mut rxb) = ConnectionHandle::channel();
        relay.directory().register(alice, bob, ha.clone());
        relay.directory().register(bob, alice, hb);

        let outcome = relay.relay(ha.id(), "hi".to_string()).await;

        assert_matches!(
            outcome,
            RelayOutcome::Relayed { sender_saved: true, receiver_saved: false, pushed: true, .. }
        );
        assert_eq!(store.find_chats(alice).await.unwrap().len(), 1);
        assert!(rxb.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_sender_failure_does_not_skip_receiver() {
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let store = Arc::new(FailingFor { user: alice, inner: MemoryChatStore::new() });
        let relay = relay_with(store.clone());
        let (ha, _rxa) = ConnectionHandle::channel();
        relay.directory().register(alice, bob, ha.clone());

        let outcome = relay.relay(ha.id(), "hi".to_string()).await;

        assert_matches!(
            outcome,
            RelayOutcome::Relayed { sender_saved: false, receiver_saved: true, pushed: false, .. }
        );
        assert_eq!(store.find_chats(bob).await.unwrap().len(), 1);
    }
}
