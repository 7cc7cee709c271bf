/**
 * Message Record
 *
 * This module defines the persisted unit of a direct-message exchange
 * between two users.
 *
 * A record is immutable once created. It is stored by value in both the
 * sender's and the receiver's chat history and pushed as-is to the
 * receiver's socket, so the JSON shape below is both the storage format
 * and the `new_message` wire payload.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single chat message between two users
///
/// # Fields
/// * `content` - The raw message text as sent by the client
/// * `from` - Sender's user ID
/// * `to` - Receiver's user ID
/// * `timestamp` - Creation time (serialized as RFC3339)
///
/// There is no message ID and no delivery or read state.
///
/// # Example
/// ```rust
/// use agora::shared::MessageRecord;
/// use uuid::Uuid;
///
/// let alice = Uuid::new_v4();
/// let bob = Uuid::new_v4();
/// let record = MessageRecord::new("hi".to_string(), alice, bob);
///
/// assert_eq!(record.content, "hi");
/// assert!(record.is_between(bob, alice));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageRecord {
    /// The message text content
    pub content: String,
    /// Sender's user ID
    pub from: Uuid,
    /// Receiver's user ID
    pub to: Uuid,
    /// When the server built the record
    pub timestamp: DateTime<Utc>,
}

impl MessageRecord {
    /// Create a new record stamped with the current UTC time
    pub fn new(content: String, from: Uuid, to: Uuid) -> Self {
        Self {
            content,
            from,
            to,
            timestamp: Utc::now(),
        }
    }

    /// True if this record belongs to the conversation between `a` and `b`
    pub fn is_between(&self, a: Uuid, b: Uuid) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }
}
