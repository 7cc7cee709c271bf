//! Shared Error Types
//!
//! Errors raised while decoding or validating wire data, before any server
//! state is touched.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON encode/decode failures (bad socket frames)
//! - `ValidationError` - A request field failed validation
//!
//! # Usage
//!
//! ```rust
//! use agora::shared::error::SharedError;
//!
//! let error = SharedError::validation("title", "Title is required");
//! assert!(error.to_string().contains("title"));
//! ```
use thiserror::Error;

/// Errors shared by the REST API and the socket channel
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_names_field() {
        let error = SharedError::validation("username", "Username must be 3-30 characters");
        assert_eq!(
            error.to_string(),
            "Validation error in field 'username': Username must be 3-30 characters"
        );
    }

    #[test]
    fn test_bad_frame_becomes_serialization_error() {
        let shared_error: SharedError = serde_json::from_str::<serde_json::Value>("{\"event\":")
            .unwrap_err()
            .into();

        assert!(matches!(
            shared_error,
            SharedError::SerializationError { ref message } if message.starts_with("JSON error")
        ));
    }
}
