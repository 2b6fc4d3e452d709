//! Error types for the storage module.

use thiserror::Error;

/// Errors that can occur while talking to remote storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Unsupported storage type \"{0}\": only webdav storage is supported")]
    UnsupportedType(String),

    #[error("Invalid storage URL: {0}")]
    InvalidUrl(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
