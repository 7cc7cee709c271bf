/**
 * Identity Directory
 *
 * In-memory mapping from a user id to the live connection speaking for that
 * user and the peer that connection is chatting with.
 *
 * # Structure
 *
 * Two maps are kept in step under a single mutex:
 * - `entries`: user id -> `ConnectionEntry`
 * - `by_connection`: connection id -> user id
 *
 * Every mutation updates both maps inside the same critical section, so a
 * connection id resolves to a user exactly when that user's entry holds the
 * connection. The lock is never held across an `.await`.
 *
 * # Lifetime
 *
 * The directory is created empty at startup, shared through `Arc`, and
 * cleared at shutdown. Nothing is persisted.
 */

use std::collections::HashMap;
use std::fmt;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::shared::ServerEvent;

/// Opaque identity of one socket connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Handle used to push events to one connection
///
/// Cloning the handle clones the sender; every clone targets the same socket
/// task. Equality is by connection id.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    outbound: mpsc::UnboundedSender<ServerEvent>,
}

impl ConnectionHandle {
    pub fn new(outbound: mpsc::UnboundedSender<ServerEvent>) -> Self {
        Self {
            id: ConnectionId::new(),
            outbound,
        }
    }

    /// Create a handle together with the receiving end of its channel
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue an event for the socket task
    ///
    /// Returns `false` when the socket task has already gone away.
    pub fn push(&self, event: ServerEvent) -> bool {
        self.outbound.send(event).is_ok()
    }
}

impl PartialEq for ConnectionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ConnectionHandle {}

/// Live binding of a user to a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionEntry {
    pub user_id: Uuid,
    pub connection: ConnectionHandle,
    /// Recipient of messages sent on this connection; not validated
    pub peer_id: Uuid,
}

#[derive(Default)]
struct DirectoryMaps {
    entries: HashMap<Uuid, ConnectionEntry>,
    by_connection: HashMap<ConnectionId, Uuid>,
}

impl DirectoryMaps {
    fn detach_user(&mut self, user_id: &Uuid) -> Option<ConnectionEntry> {
        let entry = self.entries.remove(user_id)?;
        if self.by_connection.get(&entry.connection.id()) == Some(user_id) {
            self.by_connection.remove(&entry.connection.id());
        }
        Some(entry)
    }
}

/// Directory of live connections keyed by user id
#[derive(Default)]
pub struct IdentityDirectory {
    inner: Mutex<DirectoryMaps>,
}

impl IdentityDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `user_id` to `connection`, replacing any previous binding
    ///
    /// The last register wins. If the user was bound to another connection,
    /// that connection stops resolving. If `connection` was bound to another
    /// user, that user's entry is dropped.
    pub fn register(&self, user_id: Uuid, peer_id: Uuid, connection: ConnectionHandle) {
        let mut maps = self.inner.lock();

        if let Some(previous) = maps.detach_user(&user_id) {
            if previous.connection != connection {
                tracing::debug!(
                    "[Directory] {} re-registered, {} superseded",
                    user_id,
                    previous.connection.id()
                );
            }
        }

        if let Some(other_user) = maps.by_connection.get(&connection.id()).copied() {
            maps.detach_user(&other_user);
            tracing::debug!(
                "[Directory] {} rebound from {} to {}",
                connection.id(),
                other_user,
                user_id
            );
        }

        maps.by_connection.insert(connection.id(), user_id);
        maps.entries.insert(
            user_id,
            ConnectionEntry {
                user_id,
                connection,
                peer_id,
            },
        );
    }

    /// The user bound to a connection, if any
    pub fn resolve_by_socket(&self, connection: ConnectionId) -> Option<Uuid> {
        self.inner.lock().by_connection.get(&connection).copied()
    }

    /// Resolve a connection to its full entry in one step
    pub fn entry_by_socket(&self, connection: ConnectionId) -> Option<ConnectionEntry> {
        let maps = self.inner.lock();
        let user_id = maps.by_connection.get(&connection)?;
        maps.entries.get(user_id).cloned()
    }

    pub fn remove(&self, user_id: Uuid) -> Option<ConnectionEntry> {
        self.inner.lock().detach_user(&user_id)
    }

    /// Remove whichever entry is bound to `connection`
    ///
    /// An entry that has since moved to a newer connection is left alone,
    /// because the old connection no longer resolves to it.
    pub fn remove_by_socket(&self, connection: ConnectionId) -> Option<Uuid> {
        let mut maps = self.inner.lock();
        let user_id = maps.by_connection.remove(&connection)?;
        maps.entries.remove(&user_id);
        Some(user_id)
    }

    pub fn has(&self, user_id: Uuid) -> bool {
        self.inner.lock().entries.contains_key(&user_id)
    }

    pub fn get(&self, user_id: Uuid) -> Option<ConnectionEntry> {
        self.inner.lock().entries.get(&user_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry
    pub fn clear(&self) {
        let mut maps = self.inner.lock();
        let dropped = maps.entries.len();
        maps.entries.clear();
        maps.by_connection.clear();
        tracing::info!("[Directory] Cleared {} live connections", dropped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> ConnectionHandle {
        ConnectionHandle::channel().0
    }

    #[test]
    fn test_register_then_resolve() {
        let directory = IdentityDirectory::new();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let h = handle();

        directory.register(alice, bob, h.clone());

        assert_eq!(directory.resolve_by_socket(h.id()), Some(alice));
        assert!(directory.has(alice));
        let entry = directory.get(alice).unwrap();
        assert_eq!(entry.peer_id, bob);
        assert_eq!(entry.connection, h);
    }

    #[test]
    fn test_remove_unbinds_both_directions() {
        let directory = IdentityDirectory::new();
        let alice = Uuid::new_v4();
        let h = handle();
        directory.register(alice, Uuid::new_v4(), h.clone());

        assert!(directory.remove(alice).is_some());
        assert!(!directory.has(alice));
        assert_eq!(directory.resolve_by_socket(h.id()), None);
        assert!(directory.remove(alice).is_none());
    }

    #[test]
    fn test_reregister_replaces_handle() {
        let directory = IdentityDirectory::new();
        let alice = Uuid::new_v4();
        let (old, new) = (handle(), handle());

        directory.register(alice, Uuid::new_v4(), old.clone());
        directory.register(alice, Uuid::new_v4(), new.clone());

        assert_eq!(directory.resolve_by_socket(old.id()), None);
        assert_eq!(directory.resolve_by_socket(new.id()), Some(alice));
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn test_reregister_same_handle_changes_peer() {
        let directory = IdentityDirectory::new();
        let (alice, bob, carol) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let h = handle();

        directory.register(alice, bob, h.clone());
        directory.register(alice, carol, h.clone());

        assert_eq!(directory.get(alice).unwrap().peer_id, carol);
        assert_eq!(directory.resolve_by_socket(h.id()), Some(alice));
    }

    #[test]
    fn test_handle_rebound_to_another_user() {
        let directory = IdentityDirectory::new();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let h = handle();

        directory.register(alice, bob, h.clone());
        directory.register(bob, alice, h.clone());

        assert!(!directory.has(alice));
        assert_eq!(directory.resolve_by_socket(h.id()), Some(bob));
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn test_superseded_socket_removal_keeps_new_entry() {
        let directory = IdentityDirectory::new();
        let alice = Uuid::new_v4();
        let (old, new) = (handle(), handle());

        directory.register(alice, Uuid::new_v4(), old.clone());
        directory.register(alice, Uuid::new_v4(), new.clone());

        assert_eq!(directory.remove_by_socket(old.id()), None);
        assert!(directory.has(alice));

        assert_eq!(directory.remove_by_socket(new.id()), Some(alice));
        assert!(directory.is_empty());
    }

    #[test]
    fn test_entry_by_socket() {
        let directory = IdentityDirectory::new();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let h = handle();
        directory.register(alice, bob, h.clone());

        let entry = directory.entry_by_socket(h.id()).unwrap();
        assert_eq!(entry.user_id, alice);
        assert_eq!(entry.peer_id, bob);
        assert!(directory.entry_by_socket(handle().id()).is_none());
    }

    #[test]
    fn test_clear() {
        let directory = IdentityDirectory::new();
        let h = handle();
        directory.register(Uuid::new_v4(), Uuid::new_v4(), h.clone());
        directory.register(Uuid::new_v4(), Uuid::new_v4(), handle());

        directory.clear();

        assert!(directory.is_empty());
        assert_eq!(directory.resolve_by_socket(h.id()), None);
    }

    #[test]
    fn test_push_after_receiver_dropped() {
        let (h, rx) = ConnectionHandle::channel();
        drop(rx);
        let record = crate::shared::MessageRecord::new("hi".to_string(), Uuid::new_v4(), Uuid::new_v4());
        assert!(!h.push(ServerEvent::NewMessage(record)));
    }
}
