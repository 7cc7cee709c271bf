//! Backend Error Module
//!
//! This module defines the error type returned by HTTP handlers and its
//! conversion into an HTTP response.
//!
//! # Architecture
//!
//! - **`types`** - Error type definitions and constructors
//! - **`conversion`** - `IntoResponse` implementation
//!
//! # Error Types
//!
//! - `HandlerError` - Request-level failures with an explicit status code
//! - `StateError` - A required service (the database) is not available
//! - `DatabaseError` - sqlx failures
//! - `SharedError` - Validation/serialization errors from the shared module
//! - `SerializationError` - JSON serialization errors
//!
//! # Example
//!
//! ```rust,no_run
//! use agora::backend::error::BackendError;
//! use axum::http::StatusCode;
//!
//! fn find() -> Result<(), BackendError> {
//!     Err(BackendError::not_found("Post not found"))
//! }
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::BackendError;
