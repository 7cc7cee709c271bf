/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` holds:
 * - the optional PostgreSQL pool
 * - the identity directory, message relay and lifecycle handler
 * - session signing keys
 * - the loaded `ServerConfig`
 *
 * # State Extraction
 *
 * The `FromRef` implementations allow handlers to extract only the part they
 * need, e.g. `State(pool): State<Option<PgPool>>` or
 * `State(lifecycle): State<LifecycleHandler>`.
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::backend::auth::sessions::SessionKeys;
use crate::backend::chat::store::ChatHistoryStore;
use crate::backend::error::BackendError;
use crate::backend::realtime::{IdentityDirectory, LifecycleHandler, MessageRelay};
use crate::backend::server::config::ServerConfig;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    ///
    /// `None` if `DATABASE_URL` is not set or the database was unreachable.
    /// Database-backed handlers answer 503 in that case.
    pub db_pool: Option<PgPool>,

    /// Live connections, cleared at shutdown
    pub directory: Arc<IdentityDirectory>,

    pub relay: Arc<MessageRelay>,

    /// Socket event handler wired to `directory` and `relay`
    pub lifecycle: LifecycleHandler,

    pub sessions: SessionKeys,

    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Wire the realtime services around a chat store
    pub fn new(config: ServerConfig, db_pool: Option<PgPool>, chat_store: Arc<dyn ChatHistoryStore>) -> Self {
        let directory = Arc::new(IdentityDirectory::new());
        let relay = Arc::new(MessageRelay::new(directory.clone(), chat_store));
        let lifecycle = LifecycleHandler::new(relay.clone());

        Self {
            db_pool,
            directory,
            relay,
            lifecycle,
            sessions: SessionKeys::from_config(&config),
            config: Arc::new(config),
        }
    }

    pub fn chat_store(&self) -> Arc<dyn ChatHistoryStore> {
        self.relay.store().clone()
    }
}

/// Unwrap the optional pool or fail with 503
pub fn require_pool(pool: Option<PgPool>) -> Result<PgPool, BackendError> {
    pool.ok_or_else(|| {
        tracing::error!("Database not configured");
        BackendError::state("Database not configured")
    })
}

impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

impl FromRef<AppState> for LifecycleHandler {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.lifecycle.clone()
    }
}

impl FromRef<AppState> for Arc<IdentityDirectory> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.directory.clone()
    }
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.sessions.clone()
    }
}

impl FromRef<AppState> for Arc<dyn ChatHistoryStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.chat_store()
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
