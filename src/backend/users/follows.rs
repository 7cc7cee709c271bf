/**
 * Follows
 *
 * A follow is a `(follower_id, followee_id)` row. Following twice is a
 * no-op, as is unfollowing someone you do not follow. Self-follows are
 * rejected before reaching the database.
 */

use axum::{
    extract::{Path, State},
    response::Json,
};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::auth::users::user_exists;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::require_pool;
use crate::shared::forum::{FollowEntry, MessageResponse};

#[derive(Debug, sqlx::FromRow)]
struct FollowRow {
    id: Uuid,
    username: String,
    name: String,
    since: DateTime<Utc>,
}

impl From<FollowRow> for FollowEntry {
    fn from(row: FollowRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            name: row.name,
            since: row.since,
        }
    }
}

/// Returns `true` when a new follow row was created
pub async fn insert_follow(pool: &PgPool, follower_id: Uuid, followee_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO follows (follower_id, followee_id, created_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (follower_id, followee_id) DO NOTHING
        "#,
    )
    .bind(follower_id)
    .bind(followee_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn remove_follow(pool: &PgPool, follower_id: Uuid, followee_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followee_id = $2")
        .bind(follower_id)
        .bind(followee_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn list_followers(pool: &PgPool, user_id: Uuid) -> Result<Vec<FollowEntry>, sqlx::Error> {
    let rows = sqlx::query_as::<_, FollowRow>(
        r#"
        SELECT u.id, u.username, u.name, f.created_at AS since
        FROM follows f
        JOIN users u ON u.id = f.follower_id
        WHERE f.followee_id = $1
        ORDER BY f.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(FollowEntry::from).collect())
}

pub async fn list_following(pool: &PgPool, user_id: Uuid) -> Result<Vec<FollowEntry>, sqlx::Error> {
    let rows = sqlx::query_as::<_, FollowRow>(
        r#"
        SELECT u.id, u.username, u.name, f.created_at AS since
        FROM follows f
        JOIN users u ON u.id = f.followee_id
        WHERE f.follower_id = $1
        ORDER BY f.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(FollowEntry::from).collect())
}

pub async fn follow(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Path(target): Path<Uuid>,
) -> Result<Json<MessageResponse>, BackendError> {
    if target == user.user_id {
        return Err(BackendError::bad_request("You cannot follow yourself"));
    }
    let pool = require_pool(pool)?;

    if !user_exists(&pool, target).await? {
        return Err(BackendError::not_found("User not found"));
    }

    if insert_follow(&pool, user.user_id, target).await? {
        tracing::info!("{} now follows {}", user.user_id, target);
        Ok(Json(MessageResponse::new("Followed")))
    } else {
        Ok(Json(MessageResponse::new("Already following")))
    }
}

pub async fn unfollow(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Path(target): Path<Uuid>,
) -> Result<Json<MessageResponse>, BackendError> {
    let pool = require_pool(pool)?;
    remove_follow(&pool, user.user_id, target).await?;
    Ok(Json(MessageResponse::new("Unfollowed")))
}

pub async fn get_followers(
    State(pool): State<Option<PgPool>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<FollowEntry>>, BackendError> {
    let pool = require_pool(pool)?;
    if !user_exists(&pool, id).await? {
        return Err(BackendError::not_found("User not found"));
    }
    Ok(Json(list_followers(&pool, id).await?))
}

pub async fn get_following(
    State(pool): State<Option<PgPool>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<FollowEntry>>, BackendError> {
    let pool = require_pool(pool)?;
    if !user_exists(&pool, id).await? {
        return Err(BackendError::not_found("User not found"));
    }
    Ok(Json(list_following(&pool, id).await?))
}
