//! Client error types

use shared::error::ErrorCode;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Domain code reported to the UI
    pub fn code(&self) -> ErrorCode {
        match self {
            ClientError::Http(_) | ClientError::Internal(_) => ErrorCode::BackendUnavailable,
            ClientError::InvalidResponse(_) | ClientError::Serialization(_) => {
                ErrorCode::InvalidFormat
            }
            ClientError::Unauthorized => ErrorCode::NotAuthenticated,
            ClientError::Forbidden(_) => ErrorCode::PermissionDenied,
            ClientError::NotFound(_) => ErrorCode::NotFound,
            ClientError::Validation(_) => ErrorCode::ValidationFailed,
        }
    }

    /// Backend unreachable or misbehaving rather than a rejected request
    pub fn is_transient(&self) -> bool {
        self.code().category().is_transient()
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Push channel error type
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Could not reach the snapshot source
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame could not be decoded
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Upstream closed the feed
    #[error("Channel closed")]
    Closed,
}

impl ChannelError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ChannelError::InvalidFrame(_) => ErrorCode::InvalidFormat,
            _ => ErrorCode::ChannelDisconnected,
        }
    }
}

/// Persisted cache error type
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    pub fn code(&self) -> ErrorCode {
        match self {
            StorageError::Io(_) => ErrorCode::StorageFailed,
            StorageError::Serialization(_) => ErrorCode::InvalidFormat,
        }
    }
}
