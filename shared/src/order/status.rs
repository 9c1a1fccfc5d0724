//! Order status vocabularies and the mapping between them
//!
//! The client tracks five states; the backend only knows four. Both `Ready`
//! and `Completed` map to [`BackendOrderStatus::Finished`], and `Finished`
//! always reads back as `Completed`. A `Ready` order that goes through the
//! backend therefore returns as `Completed`:
//!
//! ```
//! use shared::order::{BackendOrderStatus, OrderStatus};
//!
//! let back = OrderStatus::Ready.to_backend();
//! assert_eq!(back, BackendOrderStatus::Finished);
//! assert_eq!(back.to_client(), OrderStatus::Completed);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Client order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// Map to the backend vocabulary
    pub const fn to_backend(self) -> BackendOrderStatus {
        match self {
            OrderStatus::Pending => BackendOrderStatus::Pending,
            OrderStatus::Preparing => BackendOrderStatus::InProgress,
            OrderStatus::Ready | OrderStatus::Completed => BackendOrderStatus::Finished,
            OrderStatus::Cancelled => BackendOrderStatus::Cancelled,
        }
    }

    /// Completed and cancelled orders accept no further transitions
    pub const fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Human wording used in notifications
    pub const fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "being prepared",
            OrderStatus::Ready => "ready for pickup",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend order status
///
/// Serializes in SCREAMING_SNAKE_CASE; the legacy backend spellings are
/// accepted on input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackendOrderStatus {
    #[serde(alias = "PENDIENTE")]
    Pending,
    #[serde(alias = "en_progreso")]
    InProgress,
    #[serde(alias = "finalizado")]
    Finished,
    #[serde(alias = "cancelado")]
    Cancelled,
}

impl BackendOrderStatus {
    /// Map to the client vocabulary (`Finished` → `Completed`)
    pub const fn to_client(self) -> OrderStatus {
        match self {
            BackendOrderStatus::Pending => OrderStatus::Pending,
            BackendOrderStatus::InProgress => OrderStatus::Preparing,
            BackendOrderStatus::Finished => OrderStatus::Completed,
            BackendOrderStatus::Cancelled => OrderStatus::Cancelled,
        }
    }

    /// Path segment used by the status endpoint
    pub const fn as_str(self) -> &'static str {
        match self {
            BackendOrderStatus::Pending => "PENDING",
            BackendOrderStatus::InProgress => "IN_PROGRESS",
            BackendOrderStatus::Finished => "FINISHED",
            BackendOrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for BackendOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<OrderStatus> for BackendOrderStatus {
    fn from(status: OrderStatus) -> Self {
        status.to_backend()
    }
}

impl From<BackendOrderStatus> for OrderStatus {
    fn from(status: BackendOrderStatus) -> Self {
        status.to_client()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_reads_back_as_completed() {
        assert_eq!(OrderStatus::Ready.to_backend().to_client(), OrderStatus::Completed);
        assert_eq!(
            OrderStatus::Completed.to_backend().to_client(),
            OrderStatus::Completed
        );
    }

    #[test]
    fn test_other_statuses_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Preparing,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.to_backend().to_client(), status);
        }
    }

    #[test]
    fn test_mapping_table() {
        assert_eq!(OrderStatus::Pending.to_backend(), BackendOrderStatus::Pending);
        assert_eq!(OrderStatus::Preparing.to_backend(), BackendOrderStatus::InProgress);
        assert_eq!(OrderStatus::Ready.to_backend(), BackendOrderStatus::Finished);
        assert_eq!(OrderStatus::Completed.to_backend(), BackendOrderStatus::Finished);
        assert_eq!(OrderStatus::Cancelled.to_backend(), BackendOrderStatus::Cancelled);
    }

    #[test]
    fn test_backend_serde() {
        assert_eq!(
            serde_json::to_string(&BackendOrderStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        for (legacy, expected) in [
            ("\"PENDIENTE\"", BackendOrderStatus::Pending),
            ("\"en_progreso\"", BackendOrderStatus::InProgress),
            ("\"finalizado\"", BackendOrderStatus::Finished),
            ("\"cancelado\"", BackendOrderStatus::Cancelled),
            ("\"FINISHED\"", BackendOrderStatus::Finished),
        ] {
            let parsed: BackendOrderStatus = serde_json::from_str(legacy).unwrap();
            assert_eq!(parsed, expected);
        }
    }

    #[test]
    fn test_client_serde_and_terminal() {
        assert_eq!(serde_json::to_string(&OrderStatus::Ready).unwrap(), "\"ready\"");
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Ready.is_terminal());
        assert_eq!(OrderStatus::Preparing.to_string(), "preparing");
    }
}
