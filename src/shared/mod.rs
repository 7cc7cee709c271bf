//! Shared Module
//!
//! This module contains types and data structures that travel over the wire:
//! JSON bodies of the REST API and frames of the real-time socket channel.
//!
//! # Overview
//!
//! The shared module is free of server state. Everything here is plain data
//! designed for serde serialization.

/// Chat message record
pub mod message;

/// Real-time socket events
pub mod event;

/// Shared error types
pub mod error;

/// Forum request/response types (users, posts, comments, votes)
pub mod forum;

/// Re-export commonly used types for convenience
pub use message::MessageRecord;
pub use event::{ClientEvent, ServerEvent, RegisterPayload};
pub use error::SharedError;
pub use forum::{VoteDirection, VoteState, VoteChange};
