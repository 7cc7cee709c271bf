/**
 * Chat History Store
 *
 * Persistence seam for direct-message history. Each user owns one history
 * (a list of `MessageRecord`s); a relayed message is appended to the
 * sender's and the receiver's history by two independent calls.
 *
 * # Implementations
 *
 * - `PgChatStore` - `users.chats` jsonb column, appended in a single
 *   `UPDATE` per call
 * - `MemoryChatStore` - process-local map, used when no database is
 *   configured and in tests
 */

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::shared::MessageRecord;

/// Chat history store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// No user row with this id
    #[error("user {0} not found")]
    UserNotFound(Uuid),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("history encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Append-only per-user chat history
#[async_trait]
pub trait ChatHistoryStore: Send + Sync {
    /// Append one record to `user_id`'s history as a single atomic update
    async fn append_chat(&self, user_id: Uuid, record: &MessageRecord) -> Result<(), StoreError>;

    /// Full history of `user_id`, oldest first
    async fn find_chats(&self, user_id: Uuid) -> Result<Vec<MessageRecord>, StoreError>;
}

/// PostgreSQL-backed store writing to `users.chats`
#[derive(Clone)]
pub struct PgChatStore {
    pool: PgPool,
}

impl PgChatStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatHistoryStore for PgChatStore {
    async fn append_chat(&self, user_id: Uuid, record: &MessageRecord) -> Result<(), StoreError> {
        let value = serde_json::to_value(record)?;

        let result = sqlx::query(
            r#"
            UPDATE users
            SET chats = chats || jsonb_build_array($2::jsonb),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(value)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::UserNotFound(user_id));
        }
        Ok(())
    }

    async fn find_chats(&self, user_id: Uuid) -> Result<Vec<MessageRecord>, StoreError> {
        let chats: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT chats FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        match chats {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Err(StoreError::UserNotFound(user_id)),
        }
    }
}

/// In-memory store
///
/// Any user id is accepted; histories start empty on first append.
#[derive(Default)]
pub struct MemoryChatStore {
    histories: Mutex<HashMap<Uuid, Vec<MessageRecord>>>,
}

impl MemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatHistoryStore for MemoryChatStore {
    async fn append_chat(&self, user_id: Uuid, record: &MessageRecord) -> Result<(), StoreError> {
        self.histories
            .lock()
            .entry(user_id)
            .or_default()
            .push(record.clone());
        Ok(())
    }

    async fn find_chats(&self, user_id: Uuid) -> Result<Vec<MessageRecord>, StoreError> {
        Ok(self
            .histories
            .lock()
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Records of `history` exchanged with `peer_id`, in stored order
pub fn conversation_with(history: Vec<MessageRecord>, owner: Uuid, peer_id: Uuid) -> Vec<MessageRecord> {
    history
        .into_iter()
        .filter(|record| record.is_between(owner, peer_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_memory_store_appends_in_order() {
        let store = MemoryChatStore::new();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let first = MessageRecord::new("x".to_string(), alice, bob);
        let second = MessageRecord::new("y".to_string(), bob, alice);

        store.append_chat(alice, &first).await.unwrap();
        store.append_chat(alice, &second).await.unwrap();

        assert_eq!(store.find_chats(alice).await.unwrap(), vec![first, second]);
        assert!(store.find_chats(bob).await.unwrap().is_empty());
    }

    #[test]
    fn test_conversation_with_filters_peer() {
        let (alice, bob, carol) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let to_bob = MessageRecord::new("hi bob".to_string(), alice, bob);
        let from_carol = MessageRecord::new("hi alice".to_string(), carol, alice);
        let from_bob = MessageRecord::new("hey".to_string(), bob, alice);

        let history = vec![to_bob.clone(), from_carol, from_bob.clone()];
        assert_eq!(conversation_with(history, alice, bob), vec![to_bob, from_bob]);
    }
}
