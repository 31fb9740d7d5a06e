//! Error codes attached to every logged error.
//!
//! Clients only ever see the response envelope; the code travels in the
//! `error_code` field of the tracing event so logs can be filtered by it.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// One or more input fields failed validation
    ValidationError,

    /// Request body could not be read (bad JSON, broken multipart, ...)
    InvalidBody,

    NotFound,

    MethodNotAllowed,

    PayloadTooLarge,

    // Server errors
    InternalError,

    ServiceUnavailable,

    // Database errors (2000-2999)
    DatabaseError,

    // I/O errors (4000s)
    IoError,

    /// Image storage backend failed
    StorageError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidBody => "INVALID_BODY",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::IoError => "IO_ERROR",
            Self::StorageError => "STORAGE_ERROR",
        }
    }

    /// Integer code for structured logs:
    /// - 1000-1999: client errors
    /// - 2000-2999: database errors
    /// - 4000-4999: I/O and storage errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidBody => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::MethodNotAllowed => 1006,
            Self::PayloadTooLarge => 1007,
            Self::ServiceUnavailable => 1011,
            Self::DatabaseError => 2003,
            Self::IoError => 4001,
            Self::StorageError => 4002,
        }
    }

    /// Message used when the caller supplies none
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "The given data was invalid.",
            Self::InvalidBody => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::MethodNotAllowed => "The HTTP method is not allowed for this resource",
            Self::PayloadTooLarge => "Request body is too large",
            Self::InternalError => "Server Error",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::DatabaseError => "Server Error",
            Self::IoError => "Server Error",
            Self::StorageError => "Server Error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
