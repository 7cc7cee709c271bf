/**
 * Chat History Endpoint
 *
 * `GET /getChats/{peerId}` returns the caller's stored messages exchanged
 * with `peerId`, in stored order. Works with either store, so it is
 * available without a database.
 */

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

use crate::backend::chat::store::{conversation_with, ChatHistoryStore, StoreError};
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::shared::MessageRecord;

impl From<StoreError> for BackendError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UserNotFound(_) => BackendError::not_found("User not found"),
            StoreError::Database(e) => BackendError::DatabaseError(e),
            StoreError::Encoding(e) => BackendError::SerializationError(e),
        }
    }
}

pub async fn get_chats(
    State(store): State<Arc<dyn ChatHistoryStore>>,
    AuthUser(user): AuthUser,
    Path(peer_id): Path<Uuid>,
) -> Result<Json<Vec<MessageRecord>>, BackendError> {
    let history = store.find_chats(user.user_id).await?;
    Ok(Json(conversation_with(history, user.user_id, peer_id)))
}
