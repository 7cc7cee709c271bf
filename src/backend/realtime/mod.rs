//! Real-time Messaging Module
//!
//! Presence and direct-message relay over the `/socket` WebSocket channel.
//!
//! # Architecture
//!
//! - **`directory`** - `IdentityDirectory`: user id <-> live connection
//! - **`relay`** - `MessageRelay`: persist a message to both histories, push it live
//! - **`lifecycle`** - `LifecycleHandler`: register / message / disconnect
//! - **`socket`** - axum WebSocket endpoint, one task per connection
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs          - Module exports and documentation
//! ├── directory.rs    - Identity directory
//! ├── relay.rs        - Message relay
//! ├── lifecycle.rs    - Connection lifecycle handler
//! └── socket.rs       - WebSocket endpoint
//! ```
//!
//! # Frames
//!
//! Every frame is `{"event": <name>, "data": <payload>}`; see
//! `shared::event`.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use agora::backend::chat::store::MemoryChatStore;
//! use agora::backend::realtime::{ConnectionHandle, IdentityDirectory, LifecycleHandler, MessageRelay};
//! use agora::shared::{ClientEvent, RegisterPayload};
//! use uuid::Uuid;
//!
//! # async fn example() {
//! let directory = Arc::new(IdentityDirectory::new());
//! let relay = Arc::new(MessageRelay::new(directory, Arc::new(MemoryChatStore::new())));
//! let lifecycle = LifecycleHandler::new(relay);
//!
//! let (connection, _outbound) = ConnectionHandle::channel();
//! let register = ClientEvent::Register(RegisterPayload {
//!     current_user_id: Uuid::new_v4(),
//!     other_user_id: Uuid::new_v4(),
//! });
//! lifecycle.dispatch(&connection, register).await;
//! lifecycle.dispatch(&connection, ClientEvent::Message("hi".to_string())).await;
//! # }
//! ```

/// Identity directory
pub mod directory;

/// Message relay
pub mod relay;

/// Connection lifecycle handler
pub mod lifecycle;

/// WebSocket endpoint
pub mod socket;

pub use directory::{ConnectionEntry, ConnectionHandle, ConnectionId, IdentityDirectory};
pub use relay::{MessageRelay, RelayOutcome};
pub use lifecycle::LifecycleHandler;
pub use socket::handle_socket;
