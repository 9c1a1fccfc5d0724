//! Data models
//!
//! Client-side records shared by the engine and the UI layer.

pub mod daily_report;
pub mod invoice;
pub mod notification;
pub mod product;
pub mod store_info;

// Re-exports
pub use daily_report::*;
pub use invoice::*;
pub use notification::*;
pub use product::*;
pub use store_info::*;
