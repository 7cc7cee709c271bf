//! Post search: `GET /searchPosts?query=<text>`
//!
//! Case-insensitive substring match on post titles, newest first.

use axum::{
    extract::{Query, State},
    response::Json,
};
use sqlx::PgPool;

use crate::backend::error::BackendError;
use crate::backend::posts::db::search_posts as search_titles;
use crate::backend::server::state::require_pool;
use crate::shared::forum::{PostResponse, SearchQuery};

pub async fn search_posts(
    State(pool): State<Option<PgPool>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<PostResponse>>, BackendError> {
    let needle = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| BackendError::bad_request("Query parameter 'query' is required"))?;

    let pool = require_pool(pool)?;
    let posts = search_titles(&pool, needle).await?;
    tracing::debug!("Search '{}' matched {} posts", needle, posts.len());

    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}
