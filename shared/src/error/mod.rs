//! Error codes for the Comanda engine
//!
//! - [`ErrorCode`]: numeric codes shared with the backend and the UI
//! - [`ErrorCategory`]: classification of codes by domain
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 4xxx: Order errors
//! - 6xxx: Product errors
//! - 9xxx: Sync / system errors
//!
//! # Example
//!
//! ```
//! use shared::error::{ErrorCategory, ErrorCode};
//!
//! let code = ErrorCode::OrderNotFound;
//! assert_eq!(code.code(), 4001);
//! assert_eq!(code.category(), ErrorCategory::Order);
//! ```

mod category;
mod codes;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
