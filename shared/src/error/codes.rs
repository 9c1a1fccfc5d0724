//! Error codes used across the engine, the backend adapters and the UI
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 4xxx: Order errors
//! - 6xxx: Product errors
//! - 9xxx: Sync / system errors

use super::ErrorCategory;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 values on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid format
    InvalidFormat = 6,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Permission denied by the backend
    PermissionDenied = 1010,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Cart is empty, nothing to submit
    EmptyCart = 4002,
    /// Order is already completed or cancelled
    OrderTerminal = 4003,
    /// Order creation was rejected or failed
    OrderCreateFailed = 4004,
    /// Status update failed
    StatusUpdateFailed = 4005,
    /// Archive call failed
    ArchiveFailed = 4006,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product mutation failed
    ProductSyncFailed = 6002,

    // ==================== 9xxx: Sync / System ====================
    /// Backend unreachable or returned a server error
    BackendUnavailable = 9001,
    /// Push channel disconnected
    ChannelDisconnected = 9002,
    /// Push channel gave up reconnecting
    ReconnectExhausted = 9003,
    /// Persisted state could not be read or written
    StorageFailed = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Category of this code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidFormat => "Invalid format",

            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::PermissionDenied => "Permission denied",

            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::EmptyCart => "Cart is empty",
            ErrorCode::OrderTerminal => "Order is already completed or cancelled",
            ErrorCode::OrderCreateFailed => "Order could not be created",
            ErrorCode::StatusUpdateFailed => "Order status could not be updated",
            ErrorCode::ArchiveFailed => "Order could not be archived",

            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductSyncFailed => "Product change could not be saved",

            ErrorCode::BackendUnavailable => "Backend is unavailable",
            ErrorCode::ChannelDisconnected => "Live updates disconnected",
            ErrorCode::ReconnectExhausted => "Gave up reconnecting to live updates",
            ErrorCode::StorageFailed => "Local storage failed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            6 => Ok(ErrorCode::InvalidFormat),

            1001 => Ok(ErrorCode::NotAuthenticated),
            1010 => Ok(ErrorCode::PermissionDenied),

            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::EmptyCart),
            4003 => Ok(ErrorCode::OrderTerminal),
            4004 => Ok(ErrorCode::OrderCreateFailed),
            4005 => Ok(ErrorCode::StatusUpdateFailed),
            4006 => Ok(ErrorCode::ArchiveFailed),

            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductSyncFailed),

            9001 => Ok(ErrorCode::BackendUnavailable),
            9002 => Ok(ErrorCode::ChannelDisconnected),
            9003 => Ok(ErrorCode::ReconnectExhausted),
            9004 => Ok(ErrorCode::StorageFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::ArchiveFailed.code(), 4006);
        assert_eq!(ErrorCode::ProductNotFound.code(), 6001);
        assert_eq!(ErrorCode::ReconnectExhausted.code(), 9003);
    }

    #[test]
    fn test_try_from_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::EmptyCart,
            ErrorCode::StatusUpdateFailed,
            ErrorCode::ProductSyncFailed,
            ErrorCode::StorageFailed,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::OrderTerminal).unwrap();
        assert_eq!(json, "4003");
        let code: ErrorCode = serde_json::from_str("9002").unwrap();
        assert_eq!(code, ErrorCode::ChannelDisconnected);
        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }

    #[test]
    fn test_category() {
        assert_eq!(ErrorCode::EmptyCart.category(), ErrorCategory::Order);
        assert_eq!(ErrorCode::ProductNotFound.category(), ErrorCategory::Product);
        assert_eq!(ErrorCode::ChannelDisconnected.category(), ErrorCategory::System);
        assert_eq!(ErrorCode::Success.category(), ErrorCategory::General);
    }
}
