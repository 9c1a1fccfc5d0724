//! Shared types for the Comanda order engine
//!
//! Data model used by the client engine and by anything that talks to the
//! order backend: orders and cart lines, menu items, notifications, billing
//! records, backend wire records and the adapters between them.

pub mod auth;
pub mod error;
pub mod models;
pub mod order;
pub mod remote;
pub mod types;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use order::{BackendOrderStatus, Customer, Customization, LineItem, Order, OrderStatus};
pub use types::Timestamp;
