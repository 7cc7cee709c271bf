/**
 * Post Database Operations
 *
 * Every read returns the post joined with its author and aggregated vote
 * and comment counts, ready to be turned into a `PostResponse`.
 */

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::shared::forum::{CreatePostRequest, PostAuthor, PostResponse};

const POST_SELECT: &str = r#"
    SELECT p.id, p.title, p.description, p.file_url, p.created_at,
           u.id AS user_id, u.username, u.name,
           (SELECT COUNT(*) FROM post_votes v WHERE v.post_id = p.id AND v.value = 1) AS upvotes,
           (SELECT COUNT(*) FROM post_votes v WHERE v.post_id = p.id AND v.value = -1) AS downvotes,
           (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count
    FROM posts p
    JOIN users u ON u.id = p.user_id
"#;

/// A post row with author and counters
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub file_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub username: String,
    pub name: String,
    pub upvotes: i64,
    pub downvotes: i64,
    pub comment_count: i64,
}

impl From<PostRow> for PostResponse {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            file_url: row.file_url,
            user: PostAuthor {
                id: row.user_id,
                username: row.username,
                name: row.name,
            },
            upvotes: row.upvotes,
            downvotes: row.downvotes,
            comment_count: row.comment_count,
            created_at: row.created_at,
        }
    }
}

/// Insert a post owned by `user_id`
pub async fn create_post(pool: &PgPool, user_id: Uuid, request: &CreatePostRequest) -> Result<PostRow, sqlx::Error> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO posts (id, title, user_id, description, file_url, created_at)
        VALUES ($1, $2, $3, $4, $5, NOW())
        "#,
    )
    .bind(id)
    .bind(request.title.trim())
    .bind(user_id)
    .bind(request.description.as_deref())
    .bind(request.file_url.as_deref())
    .execute(pool)
    .await?;

    get_post(pool, id).await?.ok_or(sqlx::Error::RowNotFound)
}

pub async fn get_post(pool: &PgPool, id: Uuid) -> Result<Option<PostRow>, sqlx::Error> {
    let query = format!("{POST_SELECT} WHERE p.id = $1");
    sqlx::query_as::<_, PostRow>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn post_exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
}

/// All posts, newest first
pub async fn list_posts(pool: &PgPool) -> Result<Vec<PostRow>, sqlx::Error> {
    let query = format!("{POST_SELECT} ORDER BY p.created_at DESC");
    sqlx::query_as::<_, PostRow>(&query).fetch_all(pool).await
}

pub async fn posts_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<PostRow>, sqlx::Error> {
    let query = format!("{POST_SELECT} WHERE p.user_id = $1 ORDER BY p.created_at DESC");
    sqlx::query_as::<_, PostRow>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

/// Case-insensitive substring match on titles
pub async fn search_posts(pool: &PgPool, needle: &str) -> Result<Vec<PostRow>, sqlx::Error> {
    let query = format!(
        "{POST_SELECT} WHERE LOWER(p.title) LIKE $1 ESCAPE '\\' ORDER BY p.created_at DESC"
    );
    sqlx::query_as::<_, PostRow>(&query)
        .bind(like_pattern(needle))
        .fetch_all(pool)
        .await
}

/// `%needle%` with LIKE metacharacters escaped, lowercased
pub fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.trim().to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes() {
        assert_eq!(like_pattern("Rust"), "%rust%");
        assert_eq!(like_pattern(" 100%_done "), "%100\\%\\_done%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_row_to_response() {
        let row = PostRow {
            id: Uuid::new_v4(),
            title: "Hello".to_string(),
            description: None,
            file_url: Some("cat.png".to_string()),
            created_at: Utc::now(),
            user_id: Uuid::new_v4(),
            username: "ada_l".to_string(),
            name: "Ada".to_string(),
            upvotes: 3,
            downvotes: 1,
            comment_count: 2,
        };
        let response = PostResponse::from(row.clone());
        assert_eq!(response.user.username, "ada_l");
        assert_eq!(response.user.id, row.user_id);
        assert_eq!(response.upvotes - response.downvotes, 2);
    }
}
