//! Middleware Module
//!
//! This module contains the HTTP middleware for the backend server.
//!
//! - **`auth`** - Session token verification for protected routes
//!
//! # Example
//!
//! ```rust,no_run
//! use agora::backend::middleware::{auth_middleware, AuthUser};
//! use agora::backend::server::state::AppState;
//! use axum::{middleware, routing::get, Router};
//!
//! async fn me(AuthUser(user): AuthUser) -> String {
//!     user.username
//! }
//!
//! fn protected(state: AppState) -> Router<AppState> {
//!     Router::new()
//!         .route("/me", get(me))
//!         .route_layer(middleware::from_fn_with_state(state, auth_middleware))
//! }
//! ```

pub mod auth;

pub use auth::{auth_middleware, token_from_headers, AuthUser, AuthenticatedUser};
