/**
 * Socket Endpoint
 *
 * `GET /socket` upgrades to a WebSocket and runs one task per client.
 *
 * The task owns the socket and selects over two sources:
 * - inbound text frames, decoded into `ClientEvent`s and handled one at a
 *   time by the lifecycle handler
 * - the connection's outbound channel, whose `ServerEvent`s are written as
 *   text frames
 *
 * When the socket closes or errors, the disconnect path runs.
 */

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};

use crate::backend::realtime::directory::ConnectionHandle;
use crate::backend::realtime::lifecycle::LifecycleHandler;
use crate::shared::ClientEvent;

/// Upgrade handler for `/socket`
pub async fn handle_socket(ws: WebSocketUpgrade, State(lifecycle): State<LifecycleHandler>) -> Response {
    ws.on_upgrade(move |socket| run_connection(socket, lifecycle))
}

/// Drive one client connection until it closes
pub async fn run_connection(mut socket: WebSocket, lifecycle: LifecycleHandler) {
    let (connection, mut outbound) = ConnectionHandle::channel();
    lifecycle.on_connect(&connection);

    loop {
        tokio::select! {
            frame = socket.recv() => {
                match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        match ClientEvent::from_frame(text.as_str()) {
                            Ok(event) => {
                                let outcome = lifecycle.dispatch(&connection, event).await;
                                if outcome.is_some_and(|o| o.record().is_none()) {
                                    tracing::warn!("[Socket] Message on {} before register was dropped", connection.id());
                                }
                            }
                            Err(e) => {
                                tracing::warn!("[Socket] Ignoring undecodable frame on {}: {}", connection.id(), e);
                            }
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) | None => break,
                    Some(Ok(_)) => {} // Ping/Pong handled by axum
                    Some(Err(e)) => {
                        tracing::debug!("[Socket] {} errored: {}", connection.id(), e);
                        break;
                    }
                }
            }
            event = outbound.recv() => {
                // The handle in `connection` keeps the channel open.
                let Some(event) = event else { break };
                let frame = match event.to_frame() {
                    Ok(frame) => frame,
                    Err(e) => {
                        tracing::error!("[Socket] Failed to encode event: {}", e);
                        continue;
                    }
                };
                if socket.send(WsMessage::Text(frame.into())).await.is_err() {
                    tracing::debug!("[Socket] Send failed on {}, closing", connection.id());
                    break;
                }
            }
        }
    }

    lifecycle.on_disconnect(&connection);
}
