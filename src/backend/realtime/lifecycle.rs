/**
 * Connection Lifecycle Handler
 *
 * Maps socket events onto directory mutations and relay calls.
 *
 * | Event | Action |
 * |---|---|
 * | connect | none |
 * | `register` | bind the user and peer to this connection |
 * | `message` | hand off to the relay |
 * | disconnect | unbind this connection if it is still the user's current one |
 *
 * Per user: `unregistered -> registered -> unregistered`. Nothing is ever sent
 * back to the client on error.
 */

use std::sync::Arc;

use uuid::Uuid;

use crate::backend::realtime::directory::{ConnectionHandle, IdentityDirectory};
use crate::backend::realtime::relay::{MessageRelay, RelayOutcome};
use crate::shared::{ClientEvent, RegisterPayload};

#[derive(Clone)]
pub struct LifecycleHandler {
    directory: Arc<IdentityDirectory>,
    relay: Arc<MessageRelay>,
}

impl LifecycleHandler {
    pub fn new(relay: Arc<MessageRelay>) -> Self {
        Self {
            directory: relay.directory().clone(),
            relay,
        }
    }

    pub fn directory(&self) -> &Arc<IdentityDirectory> {
        &self.directory
    }

    pub fn on_connect(&self, connection: &ConnectionHandle) {
        tracing::debug!("[Lifecycle] {} connected", connection.id());
    }

    pub fn on_register(&self, connection: &ConnectionHandle, payload: RegisterPayload) {
        tracing::info!(
            "[Lifecycle] {} registered on {} (peer {})",
            payload.current_user_id,
            connection.id(),
            payload.other_user_id
        );
        self.directory
            .register(payload.current_user_id, payload.other_user_id, connection.clone());
    }

    pub async fn on_message(&self, connection: &ConnectionHandle, content: String) -> RelayOutcome {
        self.relay.relay(connection.id(), content).await
    }

    /// Returns the user that was unbound, if any
    pub fn on_disconnect(&self, connection: &ConnectionHandle) -> Option<Uuid> {
        let removed = self.directory.remove_by_socket(connection.id());
        match removed {
            Some(user_id) => tracing::info!("[Lifecycle] {} disconnected ({})", user_id, connection.id()),
            None => tracing::debug!("[Lifecycle] {} closed without a live entry", connection.id()),
        }
        removed
    }

    /// Route one decoded client event
    ///
    /// Returns the relay outcome for `message` events.
    pub async fn dispatch(&self, connection: &ConnectionHandle, event: ClientEvent) -> Option<RelayOutcome> {
        match event {
            ClientEvent::Register(payload) => {
                self.on_register(connection, payload);
                None
            }
            ClientEvent::Message(content) => Some(self.on_message(connection, content).await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::chat::store::{ChatHistoryStore, MemoryChatStore};
    use crate::shared::ServerEvent;
    use pretty_assertions::assert_eq;

    fn handler() -> (LifecycleHandler, Arc<MemoryChatStore>) {
        let store = Arc::new(MemoryChatStore::new());
        let relay = MessageRelay::new(Arc::new(IdentityDirectory::new()), store.clone());
        (LifecycleHandler::new(Arc::new(relay)), store)
    }

    fn register(a: Uuid, b: Uuid) -> ClientEvent {
        ClientEvent::Register(RegisterPayload {
            current_user_id: a,
            other_user_id: b,
        })
    }

    #[tokio::test]
    async fn test_conversation_is_interleaved_in_both_histories() {
        let (lifecycle, store) = handler();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let (ha, mut rxa) = ConnectionHandle::channel();
        let (hb, mut rxb) = ConnectionHandle::channel();

        lifecycle.on_connect(&ha);
        lifecycle.on_connect(&hb);
        lifecycle.dispatch(&ha, register(alice, bob)).await;
        lifecycle.dispatch(&hb, register(bob, alice)).await;
        lifecycle.dispatch(&ha, ClientEvent::Message("x".to_string())).await;
        lifecycle.dispatch(&hb, ClientEvent::Message("y".to_string())).await;

        let history = store.find_chats(alice).await.unwrap();
        let summary: Vec<_> = history
            .iter()
            .map(|r| (r.content.as_str(), r.from, r.to))
            .collect();
        assert_eq!(summary, vec![("x", alice, bob), ("y", bob, alice)]);
        assert_eq!(store.find_chats(bob).await.unwrap(), history);

        assert!(matches!(rxb.try_recv(), Ok(ServerEvent::NewMessage(r)) if r.content == "x"));
        assert!(matches!(rxa.try_recv(), Ok(ServerEvent::NewMessage(r)) if r.content == "y"));
    }

    #[tokio::test]
    async fn test_offline_receiver_gets_history_only() {
        let (lifecycle, store) = handler();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let (ha, mut rxa) = ConnectionHandle::channel();

        lifecycle.dispatch(&ha, register(alice, bob)).await;
        let outcome = lifecycle
            .dispatch(&ha, ClientEvent::Message("hello?".to_string()))
            .await
            .unwrap();

        assert!(matches!(outcome, RelayOutcome::Relayed { pushed: false, .. }));
        assert_eq!(store.find_chats(bob).await.unwrap().len(), 1);
        assert!(rxa.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_message_before_register_is_dropped() {
        let (lifecycle, _store) = handler();
        let (h, _rx) = ConnectionHandle::channel();

        let outcome = lifecycle.dispatch(&h, ClientEvent::Message("early".to_string())).await;

        assert_eq!(outcome, Some(RelayOutcome::Dropped));
        assert!(lifecycle.directory().is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_of_superseded_connection() {
        let (lifecycle, _store) = handler();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let (old, _rx_old) = ConnectionHandle::channel();
        let (new, _rx_new) = ConnectionHandle::channel();

        lifecycle.dispatch(&old, register(alice, bob)).await;
        lifecycle.dispatch(&new, register(alice, bob)).await;

        assert_eq!(lifecycle.on_disconnect(&old), None);
        assert!(lifecycle.directory().has(alice));
        assert_eq!(lifecycle.on_disconnect(&new), Some(alice));
        assert!(!lifecycle.directory().has(alice));
    }
}
