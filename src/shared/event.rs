/**
 * Real-time Socket Events
 *
 * This module defines the frames exchanged over the `/socket` channel.
 * Every frame is a JSON text message of the form
 * `{"event": "<name>", "data": <payload>}`.
 *
 * # Client to server
 * - `register` - `{"currentUserId": "<uuid>", "otherUserId": "<uuid>"}`
 * - `message` - the raw message content as a JSON string
 *
 * # Server to client
 * - `new_message` - a `MessageRecord`
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;
use crate::shared::message::MessageRecord;

/// Payload of a `register` event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    /// The user this connection speaks for
    pub current_user_id: Uuid,
    /// The peer that messages on this connection are addressed to
    pub other_user_id: Uuid,
}

/// Event sent by a client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Bind this connection to a user and a chat peer
    Register(RegisterPayload),
    /// Send a message to the registered peer
    Message(String),
}

impl ClientEvent {
    /// Decode a text frame
    pub fn from_frame(frame: &str) -> Result<Self, SharedError> {
        Ok(serde_json::from_str(frame)?)
    }
}

/// Event pushed by the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A message addressed to this connection's user
    NewMessage(MessageRecord),
}

impl ServerEvent {
    /// Encode as a text frame
    pub fn to_frame(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }
}
