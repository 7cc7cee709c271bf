/**
 * Server Initialization
 *
 * This module handles the initialization of the Axum application: database
 * loading, chat store selection, state creation and route configuration.
 *
 * # Initialization Process
 *
 * 1. Connect to PostgreSQL and run migrations (optional)
 * 2. Pick the chat history store: PostgreSQL when connected, memory otherwise
 * 3. Create the identity directory, relay and lifecycle handler
 * 4. Create the router
 */

use std::sync::Arc;

use axum::Router;

use crate::backend::chat::store::{ChatHistoryStore, MemoryChatStore, PgChatStore};
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
///
/// Returns the router together with the state, so the caller can clear the
/// identity directory on shutdown.
///
/// # Error Handling
///
/// - Missing database: server continues without database features
/// - Migration failures: logged but don't prevent startup
pub async fn create_app(config: &ServerConfig) -> (Router<()>, AppState) {
    tracing::info!("Initializing Agora backend server");

    let db_pool = load_database(config.database_url.as_deref()).await;

    let chat_store: Arc<dyn ChatHistoryStore> = match &db_pool {
        Some(pool) => Arc::new(PgChatStore::new(pool.clone())),
        None => {
            tracing::warn!("Chat history will be kept in memory only");
            Arc::new(MemoryChatStore::new())
        }
    };

    let app_state = AppState::new(config.clone(), db_pool, chat_store);
    let app = create_router(app_state.clone());

    tracing::info!("Router configured");
    (app, app_state)
}
