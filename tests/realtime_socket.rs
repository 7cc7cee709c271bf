//! End-to-end tests for the `/socket` channel using a real WebSocket client.

mod common;

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;

use agora::backend::chat::{ChatHistoryStore, MemoryChatStore};
use agora::backend::routes::create_router;
use agora::backend::server::AppState;
use agora::shared::ServerEvent;

const TIMEOUT: Duration = Duration::from_secs(5);

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Serve the router on an ephemeral port and return the socket URL
async fn boot_server() -> (String, AppState, Arc<MemoryChatStore>) {
    let store = Arc::new(MemoryChatStore::new());
    let state = common::test_state_with_store(store.clone());
    let app = create_router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    }));

    (format!("ws://{addr}/socket"), state, store)
}

async fn connect(url: &str) -> WsStream {
    let (ws, _) = connect_async(url).await.unwrap();
    ws
}

async fn send_json(ws: &mut WsStream, value: serde_json::Value) {
    ws.send(Message::text(value.to_string())).await.unwrap();
}

async fn register(ws: &mut WsStream, me: Uuid, peer: Uuid) {
    send_json(
        ws,
        json!({"event": "register", "data": {"currentUserId": me, "otherUserId": peer}}),
    )
    .await;
}

/// Poll until `check` holds or the timeout elapses
async fn wait_until(check: impl Fn() -> bool) {
    timeout(TIMEOUT, async {
        while !check() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

async fn read_event(ws: &mut WsStream) -> ServerEvent {
    loop {
        let msg = timeout(TIMEOUT, ws.next())
            .await
            .expect("timeout waiting for message")
            .expect("stream closed")
            .expect("ws error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

#[tokio::test]
async fn test_message_reaches_live_peer_and_both_histories() {
    let (url, state, store) = boot_server().await;
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

    let mut ws_alice = connect(&url).await;
    let mut ws_bob = connect(&url).await;
    register(&mut ws_alice, alice, bob).await;
    register(&mut ws_bob, bob, alice).await;
    wait_until(|| state.directory.has(alice) && state.directory.has(bob)).await;

    send_json(&mut ws_alice, json!({"event": "message", "data": "hello bob"})).await;

    let ServerEvent::NewMessage(record) = read_event(&mut ws_bob).await;
    assert_eq!(record.content, "hello bob");
    assert_eq!(record.from, alice);
    assert_eq!(record.to, bob);

    assert_eq!(store.find_chats(alice).await.unwrap(), vec![record.clone()]);
    assert_eq!(store.find_chats(bob).await.unwrap(), vec![record]);
}

#[tokio::test]
async fn test_offline_peer_still_gets_history() {
    let (url, state, store) = boot_server().await;
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

    let mut ws_alice = connect(&url).await;
    register(&mut ws_alice, alice, bob).await;
    wait_until(|| state.directory.has(alice)).await;

    send_json(&mut ws_alice, json!({"event": "message", "data": "are you there?"})).await;

    let store_for_check = store.clone();
    timeout(TIMEOUT, async move {
        loop {
            if !store_for_check.find_chats(bob).await.unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("receiver history never written");

    let history = store.find_chats(bob).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].content, "are you there?");
    assert_eq!(store.find_chats(alice).await.unwrap(), history);
}

#[tokio::test]
async fn test_malformed_frames_do_not_close_the_connection() {
    let (url, state, _store) = boot_server().await;
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

    let mut ws_alice = connect(&url).await;
    let mut ws_bob = connect(&url).await;
    ws_alice.send(Message::text("not valid json")).await.unwrap();
    send_json(&mut ws_alice, json!({"event": "typing", "data": true})).await;

    register(&mut ws_alice, alice, bob).await;
    register(&mut ws_bob, bob, alice).await;
    wait_until(|| state.directory.has(alice) && state.directory.has(bob)).await;

    send_json(&mut ws_alice, json!({"event": "message", "data": "still here"})).await;

    let ServerEvent::NewMessage(record) = read_event(&mut ws_bob).await;
    assert_eq!(record.content, "still here");
}

#[tokio::test]
async fn test_closing_the_socket_unregisters_the_user() {
    let (url, state, _store) = boot_server().await;
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

    let mut ws_alice = connect(&url).await;
    register(&mut ws_alice, alice, bob).await;
    wait_until(|| state.directory.has(alice)).await;

    ws_alice.close(None).await.unwrap();
    drop(ws_alice);

    wait_until(|| !state.directory.has(alice)).await;
    assert!(state.directory.is_empty());
}

#[tokio::test]
async fn test_reconnect_supersedes_old_socket() {
    let (url, state, _store) = boot_server().await;
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

    let mut first = connect(&url).await;
    register(&mut first, alice, bob).await;
    wait_until(|| state.directory.has(alice)).await;
    let first_id = state.directory.get(alice).map(|entry| entry.connection.id());

    let mut second = connect(&url).await;
    register(&mut second, alice, bob).await;
    wait_until(|| state.directory.get(alice).map(|entry| entry.connection.id()) != first_id).await;

    // The stale socket closing must not evict the fresh binding
    first.close(None).await.unwrap();
    drop(first);
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(state.directory.has(alice));
    let mut ws_bob = connect(&url).await;
    register(&mut ws_bob, bob, alice).await;
    wait_until(|| state.directory.has(bob)).await;

    send_json(&mut ws_bob, json!({"event": "message", "data": "welcome back"})).await;
    let ServerEvent::NewMessage(record) = read_event(&mut second).await;
    assert_eq!(record.content, "welcome back");
}
