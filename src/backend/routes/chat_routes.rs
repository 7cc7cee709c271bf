/**
 * Chat Routes
 *
 * - `GET /socket` - WebSocket upgrade into the real-time channel
 * - `GET /getChats/{peer_id}` - stored history with one peer (authenticated)
 */

use axum::{middleware, routing::get, Router};

use crate::backend::chat::get_chats;
use crate::backend::middleware::auth_middleware;
use crate::backend::realtime::handle_socket;
use crate::backend::server::state::AppState;

pub fn configure_chat_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    let history = Router::new()
        .route("/getChats/{peer_id}", get(get_chats))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), auth_middleware));

    router.route("/socket", get(handle_socket)).merge(history)
}
