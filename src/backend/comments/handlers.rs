/**
 * Comment Handlers
 *
 * Comments form a tree under a post. Only the author may edit or delete a
 * comment; deleting one removes its replies too.
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::comments::db::{self, CommentRow};
use crate::backend::comments::tree::build_comment_tree;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::posts::db::post_exists;
use crate::backend::server::state::require_pool;
use crate::backend::votes::{cast_vote, VoteTarget};
use crate::shared::forum::{
    validate_comment, CommentNode, CommentTextRequest, CommentsResponse, CreateCommentRequest, MessageResponse,
};
use crate::shared::{VoteChange, VoteDirection};

/// Body returned when a comment or reply is created
#[derive(Serialize, Debug)]
pub struct CommentCreated {
    pub message: String,
    pub comment: CommentNode,
}

pub async fn create_comment(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentCreated>), BackendError> {
    validate_comment(&request.comment)?;
    let pool = require_pool(pool)?;

    if !post_exists(&pool, request.post_id).await? {
        return Err(BackendError::not_found("Post not found"));
    }

    let comment = db::create_comment(&pool, user.user_id, request.post_id, &request.comment).await?;
    tracing::info!("Comment {} posted on {} by {}", comment.id, request.post_id, user.username);

    Ok((
        StatusCode::CREATED,
        Json(CommentCreated {
            message: "Comment successfully posted".to_string(),
            comment: comment.into(),
        }),
    ))
}

pub async fn get_comments_by_post(
    State(pool): State<Option<PgPool>>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<CommentsResponse>, BackendError> {
    let pool = require_pool(pool)?;

    if !post_exists(&pool, post_id).await? {
        return Err(BackendError::not_found("Post not found"));
    }

    let rows = db::comments_for_post(&pool, post_id).await?;
    let comments = build_comment_tree(rows.into_iter().map(CommentNode::from).collect());
    Ok(Json(CommentsResponse { comments }))
}

pub async fn reply_to_comment(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Path(parent_id): Path<Uuid>,
    Json(request): Json<CommentTextRequest>,
) -> Result<(StatusCode, Json<CommentCreated>), BackendError> {
    validate_comment(&request.comment)?;
    let pool = require_pool(pool)?;

    match db::comment_depth(&pool, parent_id).await? {
        None => return Err(BackendError::not_found("Parent comment not found")),
        Some(depth) if depth >= db::MAX_THREAD_DEPTH => {
            return Err(BackendError::bad_request("Reply thread is too deep"));
        }
        Some(_) => {}
    }

    let reply = db::create_reply(&pool, user.user_id, parent_id, &request.comment).await?;
    tracing::info!("Reply {} to {} by {}", reply.id, parent_id, user.username);

    Ok((
        StatusCode::CREATED,
        Json(CommentCreated {
            message: "Reply added".to_string(),
            comment: reply.into(),
        }),
    ))
}

/// Load a comment and check the caller wrote it
async fn owned_comment(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<CommentRow, BackendError> {
    let comment = db::get_comment(pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Comment not found"))?;
    if comment.user_id != user_id {
        tracing::warn!("User {} tried to modify comment {} of {}", user_id, id, comment.user_id);
        return Err(BackendError::forbidden("You can only modify your own comments"));
    }
    Ok(comment)
}

pub async fn update_comment(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<CommentTextRequest>,
) -> Result<Json<CommentNode>, BackendError> {
    validate_comment(&request.comment)?;
    let pool = require_pool(pool)?;

    owned_comment(&pool, id, user.user_id).await?;
    if !db::update_comment_text(&pool, id, &request.comment).await? {
        return Err(BackendError::not_found("Comment not found"));
    }

    let updated = db::get_comment(&pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Comment not found"))?;
    Ok(Json(updated.into()))
}

pub async fn delete_comment(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, BackendError> {
    let pool = require_pool(pool)?;

    owned_comment(&pool, id, user.user_id).await?;
    db::delete_comment(&pool, id).await?;
    tracing::info!("Comment {} deleted by {}", id, user.username);

    Ok(Json(MessageResponse::new("Comment deleted")))
}

pub async fn like_comment(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<VoteChange>, BackendError> {
    vote(pool, user.user_id, id, VoteDirection::Up).await
}

pub async fn dislike_comment(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<VoteChange>, BackendError> {
    vote(pool, user.user_id, id, VoteDirection::Down).await
}

async fn vote(
    pool: Option<PgPool>,
    user_id: Uuid,
    comment_id: Uuid,
    direction: VoteDirection,
) -> Result<Json<VoteChange>, BackendError> {
    let pool = require_pool(pool)?;
    if db::get_comment(&pool, comment_id).await?.is_none() {
        return Err(BackendError::not_found("Comment not found"));
    }
    let change = cast_vote(&pool, VoteTarget::Comment(comment_id), user_id, direction).await?;
    Ok(Json(change))
}
