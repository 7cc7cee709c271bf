/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Layout
 *
 * 1. Chat routes (`/socket`, `/getChats/{peer_id}`)
 * 2. API routes (auth, users, follows, posts, comments, search)
 * 3. `/uploads` static files
 * 4. JSON 404 fallback
 *
 * # Layers
 *
 * - `TraceLayer` for request spans
 * - `CorsLayer` allowing the configured browser origin with credentials,
 *   so the session cookie is sent cross-origin
 */

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::routes::chat_routes::configure_chat_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = configure_chat_routes(Router::new(), &app_state);
    let router = configure_api_routes(router, &app_state);

    let router = router
        .nest_service("/uploads", ServeDir::new(&app_state.config.upload_dir))
        .fallback(|| async { BackendError::not_found("Route not found") });

    router
        .layer(cors_layer(&app_state.config.cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// CORS for a single credentialed origin
///
/// An origin that is not a valid header value falls back to same-origin only.
pub fn cors_layer(origin: &str) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true);

    match HeaderValue::from_str(origin) {
        Ok(value) => base.allow_origin(value),
        Err(e) => {
            tracing::warn!("Invalid CORS_ORIGIN {:?}: {}; cross-origin requests disabled", origin, e);
            base
        }
    }
}
