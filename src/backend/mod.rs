//! Backend Module
//!
//! This module contains all server-side code for Agora. It provides an Axum
//! HTTP server with a REST API for the forum and a WebSocket channel for
//! direct messaging.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - Router assembly
//! - **`realtime`** - Identity directory, message relay, connection lifecycle, socket endpoint
//! - **`chat`** - Chat history storage and the history endpoint
//! - **`auth`** - Registration, login, JWT sessions, user records
//! - **`middleware`** - Authentication extraction
//! - **`users`** - User profile and follow endpoints
//! - **`posts`** - Posts and post votes
//! - **`comments`** - Nested comments and comment votes
//! - **`search`** - Post title search
//! - **`votes`** - Up/down vote storage for posts and comments
//! - **`error`** - Backend error type and HTTP conversion
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Config, state, init
//! ├── routes/         - Router
//! ├── realtime/       - Presence + relay core
//! ├── chat/           - History store
//! ├── auth/           - Authentication
//! ├── middleware/     - Request middleware
//! ├── users/          - Users and follows
//! ├── posts/          - Posts and votes
//! ├── comments/       - Comments
//! ├── search/         - Search
//! ├── votes.rs        - Vote storage
//! └── error/          - Error types
//! ```
//!
//! # State Management
//!
//! `AppState` holds the optional PostgreSQL pool, the identity directory and
//! the message relay. Handlers extract only the part they need through
//! `FromRef`.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Presence and message relay
pub mod realtime;

/// Chat history persistence
pub mod chat;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// User profile and follow handlers
pub mod users;

/// Posts and post votes
pub mod posts;

/// Comments and comment votes
pub mod comments;

/// Post search
pub mod search;

/// Vote storage shared by posts and comments
pub mod votes;

/// Re-export commonly used types
pub use server::create_app;
pub use realtime::{IdentityDirectory, MessageRelay, LifecycleHandler};
pub use error::BackendError;
