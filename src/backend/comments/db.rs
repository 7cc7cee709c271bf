/**
 * Comment Database Operations
 *
 * Top-level comments reference their post through `post_id`; replies
 * reference their parent through `parent_id` only. Deleting a comment
 * cascades to its replies. Threads are at most `MAX_THREAD_DEPTH` levels
 * deep, top-level comments counting as level 1.
 */

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::shared::forum::{CommentAuthor, CommentNode};

/// Deepest level a reply may sit at
pub const MAX_THREAD_DEPTH: i32 = 64;

const COMMENT_COLUMNS: &str = r#"
    c.id, c.text, c.post_id, c.parent_id, c.created_at,
    u.id AS user_id, u.username, u.email,
    COALESCE((SELECT SUM(v.value)::BIGINT FROM comment_votes v WHERE v.comment_id = c.id), 0) AS score
"#;

/// A comment row with its author and score
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRow {
    pub id: Uuid,
    pub text: String,
    pub post_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub score: i64,
}

impl From<CommentRow> for CommentNode {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            text: row.text,
            user: CommentAuthor {
                id: row.user_id,
                username: row.username,
                email: row.email,
            },
            post_id: row.post_id,
            parent_id: row.parent_id,
            score: row.score,
            created_at: row.created_at,
            children: Vec::new(),
        }
    }
}

async fn insert_comment(
    pool: &PgPool,
    user_id: Uuid,
    text: &str,
    post_id: Option<Uuid>,
    parent_id: Option<Uuid>,
) -> Result<CommentRow, sqlx::Error> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO comments (id, text, user_id, post_id, parent_id, created_at)
        VALUES ($1, $2, $3, $4, $5, NOW())
        "#,
    )
    .bind(id)
    .bind(text.trim())
    .bind(user_id)
    .bind(post_id)
    .bind(parent_id)
    .execute(pool)
    .await?;

    get_comment(pool, id).await?.ok_or(sqlx::Error::RowNotFound)
}

/// Top-level comment on a post
pub async fn create_comment(pool: &PgPool, user_id: Uuid, post_id: Uuid, text: &str) -> Result<CommentRow, sqlx::Error> {
    insert_comment(pool, user_id, text, Some(post_id), None).await
}

/// Reply to an existing comment
pub async fn create_reply(pool: &PgPool, user_id: Uuid, parent_id: Uuid, text: &str) -> Result<CommentRow, sqlx::Error> {
    insert_comment(pool, user_id, text, None, Some(parent_id)).await
}

pub async fn get_comment(pool: &PgPool, id: Uuid) -> Result<Option<CommentRow>, sqlx::Error> {
    let query = format!(
        "SELECT {COMMENT_COLUMNS} FROM comments c JOIN users u ON u.id = c.user_id WHERE c.id = $1"
    );
    sqlx::query_as::<_, CommentRow>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Every comment of a post, replies included, oldest first
pub async fn comments_for_post(pool: &PgPool, post_id: Uuid) -> Result<Vec<CommentRow>, sqlx::Error> {
    let query = format!(
        r#"
        WITH RECURSIVE thread AS (
            SELECT id, 1 AS depth FROM comments WHERE post_id = $1
            UNION ALL
            SELECT child.id, thread.depth + 1
            FROM comments child
            JOIN thread ON child.parent_id = thread.id
            WHERE thread.depth < $2
        )
        SELECT {COMMENT_COLUMNS}
        FROM comments c
        JOIN thread t ON t.id = c.id
        JOIN users u ON u.id = c.user_id
        ORDER BY c.created_at ASC
        "#
    );
    sqlx::query_as::<_, CommentRow>(&query)
        .bind(post_id)
        .bind(MAX_THREAD_DEPTH)
        .fetch_all(pool)
        .await
}

/// Level of a comment in its thread, or `None` if it does not exist
///
/// The walk up the parent chain stops one past `MAX_THREAD_DEPTH`.
pub async fn comment_depth(pool: &PgPool, id: Uuid) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<i32>>(
        r#"
        WITH RECURSIVE chain AS (
            SELECT id, parent_id, 1 AS depth FROM comments WHERE id = $1
            UNION ALL
            SELECT parent.id, parent.parent_id, chain.depth + 1
            FROM comments parent
            JOIN chain ON parent.id = chain.parent_id
            WHERE chain.depth <= $2
        )
        SELECT MAX(depth) FROM chain
        "#,
    )
    .bind(id)
    .bind(MAX_THREAD_DEPTH)
    .fetch_one(pool)
    .await
}

/// Comments and replies written by a user, newest first
pub async fn comments_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<CommentRow>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {COMMENT_COLUMNS}
        FROM comments c
        JOIN users u ON u.id = c.user_id
        WHERE c.user_id = $1
        ORDER BY c.created_at DESC
        "#
    );
    sqlx::query_as::<_, CommentRow>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn update_comment_text(pool: &PgPool, id: Uuid, text: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE comments SET text = $2 WHERE id = $1")
        .bind(id)
        .bind(text.trim())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_comment(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
