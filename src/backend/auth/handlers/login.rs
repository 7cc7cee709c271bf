/**
 * Login and Logout Handlers
 *
 * # Authentication Process
 *
 * 1. Look up user by email
 * 2. Verify password using bcrypt
 * 3. Generate JWT token
 * 4. Return token and user info, and set the `access_token` cookie
 *
 * # Security
 *
 * - Unknown email and wrong password both return 401 with the same message
 * - The cookie is `HttpOnly`
 * - Passwords are never logged or returned in responses
 */
use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderValue},
    response::{IntoResponse, Json, Response},
};
use bcrypt::verify;
use sqlx::PgPool;

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest, UserResponse};
use crate::backend::auth::sessions::{clear_session_cookie, session_cookie, SessionKeys};
use crate::backend::auth::users::get_user_by_email;
use crate::backend::error::BackendError;
use crate::backend::server::state::require_pool;
use crate::shared::forum::MessageResponse;

/// Login handler
///
/// # Errors
///
/// * `401 Unauthorized` - If user is not found or password is incorrect
/// * `503 Service Unavailable` - If database is not configured
///
/// # Example Response
///
/// ```json
/// {
///   "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
///   "user": {
///     "id": "123e4567-e89b-12d3-a456-426614174000",
///     "username": "ada_l",
///     "name": "Ada",
///     "age": 36,
///     "email": "ada@example.com",
///     "created_at": "2024-01-01T00:00:00Z"
///   }
/// }
/// ```
pub async fn login(
    State(pool): State<Option<PgPool>>,
    State(sessions): State<SessionKeys>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, BackendError> {
    let pool = require_pool(pool)?;
    let email = request.email.trim().to_lowercase();
    tracing::info!("Login request for: {}", email);

    let user = get_user_by_email(&pool, &email).await?.ok_or_else(|| {
        tracing::warn!("User not found: {}", email);
        BackendError::unauthorized("Invalid email or password")
    })?;

    let valid = verify(&request.password, &user.password_hash).map_err(|e| {
        tracing::error!("Password verification error: {:?}", e);
        BackendError::internal("Failed to verify credentials")
    })?;

    if !valid {
        tracing::warn!("Invalid password for user: {}", email);
        return Err(BackendError::unauthorized("Invalid email or password"));
    }

    let token = sessions
        .create_token(user.id, &user.email, &user.username)
        .map_err(|e| {
            tracing::error!("Failed to create token: {:?}", e);
            BackendError::internal("Failed to create session")
        })?;

    let cookie = HeaderValue::from_str(&session_cookie(&token, sessions.ttl_secs())).map_err(|e| {
        tracing::error!("Failed to build session cookie: {:?}", e);
        BackendError::internal("Failed to create session")
    })?;

    tracing::info!("User logged in successfully: {} ({})", user.username, user.email);

    let body = AuthResponse {
        token,
        user: UserResponse::from(user),
    };
    Ok(([(SET_COOKIE, cookie)], Json(body)).into_response())
}

/// Logout handler: expires the session cookie
///
/// Tokens are stateless; a bearer token stays valid until it expires.
pub async fn logout() -> Response {
    let cookie = HeaderValue::from_str(&clear_session_cookie())
        .unwrap_or_else(|_| HeaderValue::from_static("access_token=; Max-Age=0"));
    (
        [(SET_COOKIE, cookie)],
        Json(MessageResponse::new("Logged out")),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let response = logout().await;
        let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("access_token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
