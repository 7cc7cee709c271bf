/**
 * Current User Handlers
 *
 * - `GET /check-auth` returns the verified token claims
 * - `GET /getUserByCookie` loads the caller's user record
 *
 * Both sit behind `auth_middleware`, so a missing or invalid token is
 * already rejected with 401.
 */

use axum::{extract::State, response::Json};
use serde::Serialize;
use sqlx::PgPool;

use crate::backend::auth::handlers::types::UserResponse;
use crate::backend::auth::sessions::Claims;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::require_pool;

#[derive(Serialize, Debug)]
pub struct CheckAuthResponse {
    pub authenticated: bool,
    pub user: Claims,
}

pub async fn check_auth(AuthUser(user): AuthUser) -> Json<CheckAuthResponse> {
    Json(CheckAuthResponse {
        authenticated: true,
        user: user.claims,
    })
}

/// Get current user handler
///
/// # Errors
///
/// * `404 Not Found` - If the user was deleted after the token was issued
/// * `503 Service Unavailable` - If database is not configured
pub async fn get_user_by_cookie(
    State(pool): State<Option<PgPool>>,
    AuthUser(auth): AuthUser,
) -> Result<Json<UserResponse>, BackendError> {
    let pool = require_pool(pool)?;

    let user = get_user_by_id(&pool, auth.user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    Ok(Json(UserResponse::from(user)))
}
