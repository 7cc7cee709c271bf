/**
 * Authentication Middleware
 *
 * This module provides middleware for protecting routes that require
 * user authentication. It extracts and verifies the JWT token from the
 * `Authorization: Bearer` header or, failing that, the `access_token`
 * cookie, and provides the user to handlers.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
        HeaderMap,
    },
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::auth::sessions::{token_from_cookie_header, Claims};
use crate::backend::auth::users::user_exists;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Authenticated user data extracted from JWT token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub username: String,
    pub claims: Claims,
}

/// Locate the session token in request headers
///
/// The bearer header wins over the cookie.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .find_map(token_from_cookie_header)
        .map(str::to_string)
}

/// Authentication middleware
///
/// 1. Extracts the token from the bearer header or the session cookie
/// 2. Verifies the token
/// 3. Checks the user still exists (when a database is configured)
/// 4. Attaches `AuthenticatedUser` to request extensions
///
/// Returns 401 Unauthorized if the token is missing or invalid.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = token_from_headers(request.headers()).ok_or_else(|| {
        tracing::warn!("Missing session token");
        BackendError::unauthorized("Authentication required")
    })?;

    let claims = app_state.sessions.verify_token(&token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        BackendError::unauthorized("Invalid or expired token")
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
        tracing::warn!("Invalid user ID in token: {:?}", e);
        BackendError::unauthorized("Invalid or expired token")
    })?;

    if let Some(pool) = &app_state.db_pool {
        if !user_exists(pool, user_id).await? {
            tracing::warn!("Token for deleted user {}", user_id);
            return Err(BackendError::unauthorized("Invalid or expired token"));
        }
    }

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        email: claims.email.clone(),
        username: claims.username.clone(),
        claims,
    });

    Ok(next.run(request).await)
}

/// Axum extractor for the user set by `auth_middleware`
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::unauthorized("Authentication required")
            })?;

        Ok(AuthUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_cookie_token() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; access_token=from.cookie"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("from.cookie"));
    }

    #[test]
    fn test_bearer_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from.header"));
        headers.insert(COOKIE, HeaderValue::from_static("access_token=from.cookie"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("from.header"));
    }

    #[test]
    fn test_missing_or_malformed() {
        let mut headers = HeaderMap::new();
        assert_eq!(token_from_headers(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(token_from_headers(&headers), None);
    }

    #[tokio::test]
    async fn test_extractor_requires_extension() {
        let (mut parts, _) = axum::http::Request::builder().body(()).unwrap().into_parts();
        let rejected = AuthUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(rejected.status_code(), axum::http::StatusCode::UNAUTHORIZED);
    }

    fn guarded_app(state: AppState) -> axum::Router {
        axum::Router::new()
            .route(
                "/whoami",
                axum::routing::get(|AuthUser(user): AuthUser| async move { user.username }),
            )
            .route_layer(axum::middleware::from_fn_with_state(state.clone(), auth_middleware))
            .with_state(state)
    }

    fn test_state() -> AppState {
        use crate::backend::chat::store::MemoryChatStore;
        use crate::backend::server::config::ServerConfig;

        AppState::new(ServerConfig::default(), None, std::sync::Arc::new(MemoryChatStore::new()))
    }

    #[tokio::test]
    async fn test_middleware_attaches_user() {
        use tower::ServiceExt;

        let state = test_state();
        let token = state
            .sessions
            .create_token(Uuid::new_v4(), "carol@example.com", "carol")
            .unwrap();
        let request = axum::http::Request::builder()
            .uri("/whoami")
            .header(COOKIE, format!("access_token={}", token))
            .body(axum::body::Body::empty())
            .unwrap();

        let response = guarded_app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"carol");
    }

    #[tokio::test]
    async fn test_middleware_rejects_missing_token() {
        use tower::ServiceExt;

        let request = axum::http::Request::builder()
            .uri("/whoami")
            .body(axum::body::Body::empty())
            .unwrap();

        let response = guarded_app(test_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
