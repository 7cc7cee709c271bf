//! Chat Backend Module
//!
//! Storage of direct-message history and the endpoint that reads it.
//! Live delivery is handled by `realtime`.
//!
//! # Architecture
//!
//! - **`store`** - `ChatHistoryStore` trait with PostgreSQL and in-memory implementations
//! - **`history`** - `GET /getChats/{peerId}`
//!
//! # Example
//!
//! ```rust
//! use agora::backend::chat::store::{ChatHistoryStore, MemoryChatStore};
//! use agora::shared::MessageRecord;
//! use uuid::Uuid;
//!
//! # async fn example() {
//! let store = MemoryChatStore::new();
//! let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
//! let record = MessageRecord::new("hi".to_string(), alice, bob);
//! store.append_chat(alice, &record).await.unwrap();
//! assert_eq!(store.find_chats(alice).await.unwrap().len(), 1);
//! # }
//! ```

/// History store trait and implementations
pub mod store;

/// History endpoint
pub mod history;

pub use store::{ChatHistoryStore, MemoryChatStore, PgChatStore, StoreError};
pub use history::get_chats;
