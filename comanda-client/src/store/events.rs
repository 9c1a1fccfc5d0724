//! Order store events

use shared::order::OrderStatus;

/// Where a status change came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// Optimistic edit on this station
    Local,
    /// Observed in a snapshot
    Remote,
}

/// Events published by the order store
#[derive(Debug, Clone, PartialEq)]
pub enum OrderStoreEvent {
    /// A snapshot replaced the order set
    OrdersReconciled { sequence: u64, count: usize },
    /// An order left the cart; `synced` is false when the backend call failed
    OrderPlaced {
        order_id: String,
        client_ref: String,
        synced: bool,
    },
    StatusChanged {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
        origin: ChangeOrigin,
    },
    /// Completed order could not be archived; it stays active
    ArchiveFailed { order_id: String, error: String },
    MenuUpdated { count: usize },
}
