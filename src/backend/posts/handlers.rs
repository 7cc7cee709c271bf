/**
 * Post Handlers
 *
 * | Route | Handler |
 * |---|---|
 * | `GET /getAllPosts` | `get_all_posts` |
 * | `GET /getPostById/{id}` | `get_post_by_id` |
 * | `GET /getPostsByCookie` | `get_posts_by_cookie` |
 * | `POST /createPost` | `create_post` |
 * | `POST /upvote`, `POST /downvote` | `upvote`, `downvote` |
 * | `POST /getVoteState` | `get_vote_state` |
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::posts::db;
use crate::backend::server::state::require_pool;
use crate::backend::votes::{cast_vote, vote_state, VoteTarget};
use crate::shared::forum::{CreatePostRequest, PostResponse, PostVoteRequest, VoteStateResponse};
use crate::shared::{VoteChange, VoteDirection};

pub async fn get_all_posts(State(pool): State<Option<PgPool>>) -> Result<Json<Vec<PostResponse>>, BackendError> {
    let pool = require_pool(pool)?;
    let posts = db::list_posts(&pool).await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

pub async fn get_post_by_id(
    State(pool): State<Option<PgPool>>,
    Path(id): Path<Uuid>,
) -> Result<Json<PostResponse>, BackendError> {
    let pool = require_pool(pool)?;
    let post = db::get_post(&pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Post not found"))?;
    Ok(Json(post.into()))
}

/// Posts written by the caller
pub async fn get_posts_by_cookie(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<PostResponse>>, BackendError> {
    let pool = require_pool(pool)?;
    let posts = db::posts_by_user(&pool, user.user_id).await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

pub async fn create_post(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), BackendError> {
    request.validate()?;
    let pool = require_pool(pool)?;

    let post = db::create_post(&pool, user.user_id, &request).await?;
    tracing::info!("Post {} created by {}", post.id, user.username);

    Ok((StatusCode::CREATED, Json(post.into())))
}

pub async fn upvote(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Json(request): Json<PostVoteRequest>,
) -> Result<Json<VoteChange>, BackendError> {
    vote(pool, user.user_id, request.post_id, VoteDirection::Up).await
}

pub async fn downvote(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Json(request): Json<PostVoteRequest>,
) -> Result<Json<VoteChange>, BackendError> {
    vote(pool, user.user_id, request.post_id, VoteDirection::Down).await
}

async fn vote(
    pool: Option<PgPool>,
    user_id: Uuid,
    post_id: Uuid,
    direction: VoteDirection,
) -> Result<Json<VoteChange>, BackendError> {
    let pool = require_pool(pool)?;
    if !db::post_exists(&pool, post_id).await? {
        return Err(BackendError::not_found("Post not found"));
    }
    let change = cast_vote(&pool, VoteTarget::Post(post_id), user_id, direction).await?;
    Ok(Json(change))
}

pub async fn get_vote_state(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Json(request): Json<PostVoteRequest>,
) -> Result<Json<VoteStateResponse>, BackendError> {
    let pool = require_pool(pool)?;
    if !db::post_exists(&pool, request.post_id).await? {
        return Err(BackendError::not_found("Post not found"));
    }
    let state = vote_state(&pool, VoteTarget::Post(request.post_id), user.user_id).await?;
    Ok(Json(VoteStateResponse {
        vote_state: state.as_i16(),
    }))
}
