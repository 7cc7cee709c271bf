/**
 * User Handlers
 *
 * Public profile reads plus edit/delete of the caller's own account.
 */

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Json,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::auth::handlers::types::{UpdateUserRequest, UserResponse};
use crate::backend::auth::users::{self, get_user_by_id, get_user_by_username, user_exists, UserChanges};
use crate::backend::comments::db::comments_by_user;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::posts::db::posts_by_user;
use crate::backend::realtime::IdentityDirectory;
use crate::backend::server::state::require_pool;
use crate::shared::forum::{CommentNode, MessageResponse, PostResponse};

pub async fn get_all_users(State(pool): State<Option<PgPool>>) -> Result<Json<Vec<UserResponse>>, BackendError> {
    let pool = require_pool(pool)?;
    let users = users::list_users(&pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn get_user_by_id_handler(
    State(pool): State<Option<PgPool>>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, BackendError> {
    let pool = require_pool(pool)?;
    let user = get_user_by_id(&pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;
    Ok(Json(user.into()))
}

/// Partial update of the caller's profile
pub async fn edit_user(
    State(pool): State<Option<PgPool>>,
    AuthUser(auth): AuthUser,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, BackendError> {
    request.validate()?;
    let pool = require_pool(pool)?;

    let username = request.username.map(|u| u.trim().to_string());
    if let Some(username) = &username {
        if let Some(existing) = get_user_by_username(&pool, username).await? {
            if existing.id != auth.user_id {
                return Err(BackendError::conflict("Username already exists"));
            }
        }
    }

    let changes = UserChanges {
        username,
        name: request.name.map(|n| n.trim().to_string()),
        age: request.age,
    };

    let user = users::update_user(&pool, auth.user_id, changes)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    tracing::info!("User {} updated their profile", user.id);
    Ok(Json(user.into()))
}

/// Delete an account; only the account owner may do this
pub async fn delete_user(
    State(pool): State<Option<PgPool>>,
    State(directory): State<Arc<IdentityDirectory>>,
    AuthUser(auth): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, BackendError> {
    if id != auth.user_id {
        tracing::warn!("User {} tried to delete {}", auth.user_id, id);
        return Err(BackendError::forbidden("You can only delete your own account"));
    }
    let pool = require_pool(pool)?;

    if !users::delete_user(&pool, id).await? {
        return Err(BackendError::not_found("User not found"));
    }
    directory.remove(id);

    tracing::info!("User {} deleted", id);
    Ok(Json(MessageResponse::new("User deleted")))
}

pub async fn get_user_posts(
    State(pool): State<Option<PgPool>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PostResponse>>, BackendError> {
    let pool = require_pool(pool)?;
    if !user_exists(&pool, id).await? {
        return Err(BackendError::not_found("User not found"));
    }
    let posts = posts_by_user(&pool, id).await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

pub async fn get_user_comments(
    State(pool): State<Option<PgPool>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CommentNode>>, BackendError> {
    let pool = require_pool(pool)?;
    if !user_exists(&pool, id).await? {
        return Err(BackendError::not_found("User not found"));
    }
    let comments = comments_by_user(&pool, id).await?;
    Ok(Json(comments.into_iter().map(CommentNode::from).collect()))
}
