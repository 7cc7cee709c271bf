/**
 * Backend Error Types
 *
 * This module defines the error type used by every HTTP handler.
 * Each variant maps to an HTTP status code and a client-safe message.
 *
 * # Error Categories
 *
 * ## Handler Errors
 *
 * Raised while processing a request:
 * - Missing or invalid credentials
 * - Referenced record not found
 * - Caller does not own the record
 *
 * ## State Errors
 *
 * A service the route depends on is not configured (no `DATABASE_URL`).
 *
 * ## Database Errors
 *
 * sqlx failures. Unique and foreign-key violations are surfaced as 409 and
 * 404; everything else becomes an opaque 500 and is logged in full.
 */

use thiserror::Error;
use axum::http::StatusCode;
use crate::shared::SharedError;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use agora::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::handler(StatusCode::BAD_REQUEST, "Invalid request");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
///
/// let err = BackendError::state("Database not configured");
/// assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Request-level failure with an explicit status
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// A required service is not available
    #[error("State error: {message}")]
    StateError {
        /// Human-readable error message
        message: String,
    },

    /// Database failure
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// Shared error (validation, frame decoding)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Create a new state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::StateError {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `StateError` - 503 Service Unavailable
    /// - `DatabaseError` - 409 on unique violation, 404 on foreign-key violation, else 500
    /// - `SharedError` - 400 Bad Request
    /// - `SerializationError` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::StateError { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::DatabaseError(err) => match err {
                sqlx::Error::Database(db) if db.is_unique_violation() => StatusCode::CONFLICT,
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => StatusCode::NOT_FOUND,
                sqlx::Error::RowNotFound => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::SharedError(_) => StatusCode::BAD_REQUEST,
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the client-facing error message
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::StateError { message } => message.clone(),
            Self::DatabaseError(_) => match self.status_code() {
                StatusCode::CONFLICT => "Record already exists".to_string(),
                StatusCode::NOT_FOUND => "Referenced record not found".to_string(),
                _ => "Internal database error".to_string(),
            },
            Self::SharedError(err) => err.to_string(),
            Self::SerializationError(_) => "Internal serialization error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error() {
        let error = BackendError::handler(StatusCode::BAD_REQUEST, "Invalid request");
        match error {
            BackendError::HandlerError { status, message } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message, "Invalid request");
            }
            _ => panic!("Expected HandlerError"),
        }
    }

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(BackendError::unauthorized("no").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(BackendError::forbidden("no").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(BackendError::not_found("no").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(BackendError::conflict("no").status_code(), StatusCode::CONFLICT);
        assert_eq!(BackendError::state("no db").status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            BackendError::DatabaseError(sqlx::Error::RowNotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            BackendError::DatabaseError(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_database_message_is_opaque() {
        let error = BackendError::DatabaseError(sqlx::Error::PoolTimedOut);
        assert_eq!(error.message(), "Internal database error");
    }

    #[test]
    fn test_serialization_message_is_opaque() {
        let raw = serde_json::from_str::<serde_json::Value>("{\"chats\": [").unwrap_err();
        let error = BackendError::SerializationError(raw);
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.message(), "Internal serialization error");
    }

    #[test]
    fn test_from_shared_error() {
        let backend_error: BackendError = SharedError::validation("title", "required").into();
        assert_eq!(backend_error.status_code(), StatusCode::BAD_REQUEST);
        assert!(backend_error.message().contains("title"));
    }
}
