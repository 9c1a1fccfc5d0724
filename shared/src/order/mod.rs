//! Order Module
//!
//! Client order model, the status vocabularies shared with the backend and
//! the adapters between backend records and client records.

pub mod adapter;
pub mod status;
pub mod types;

// Re-exports
pub use status::{BackendOrderStatus, OrderStatus};
pub use types::*;
