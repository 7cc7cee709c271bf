//! Agora - Main Library
//!
//! Agora is a social-forum backend built with Rust: posts, nested comments,
//! voting, following, and direct messaging over a real-time socket channel.
//!
//! # Overview
//!
//! This library provides:
//! - A REST API for users, posts, comments, votes, follows and search
//! - JWT authentication (bearer header or `access_token` cookie)
//! - A presence + relay core for one-to-one chat over WebSockets
//! - PostgreSQL persistence via sqlx
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types shared by the HTTP API and the socket channel
//!   - Message records, socket events, forum DTOs
//!   - Shared error types
//!
//! - **`backend`** - Server-side code
//!   - Axum HTTP server and router
//!   - Identity directory, message relay, connection lifecycle
//!   - Authentication, forum handlers, database access
//!
//! # Usage
//!
//! ```rust,no_run
//! use agora::backend::server::{config::ServerConfig, init::create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let (app, _state) = create_app(&config).await;
//! let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! - The identity directory is shared behind `Arc` with a short-lived mutex
//! - Database pool is thread-safe and cheaply cloneable
//! - Every socket connection runs in its own task and handles its events in order

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
