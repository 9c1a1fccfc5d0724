//! Remote order and product services
//!
//! The engine only talks to the backend through these traits. [`http`]
//! holds the REST implementation; [`simulated`] an in-process backend that
//! mirrors its active orders onto a [`MemoryHub`](crate::channel::MemoryHub).

mod http;
pub mod simulated;

pub use http::{HttpOrderService, HttpProductService};
pub use simulated::SimulatedBackend;

use crate::ClientResult;
use async_trait::async_trait;
use shared::order::BackendOrderStatus;
use shared::remote::{ApiOrder, ApiProduct, CreateOrderRequest, ProductDraft, ProductPatch};

/// Durable order operations
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Persist a new order; the backend assigns the id
    async fn create_order(&self, request: &CreateOrderRequest) -> ClientResult<ApiOrder>;

    async fn update_status(&self, order_id: &str, status: BackendOrderStatus)
    -> ClientResult<ApiOrder>;

    /// Move an order out of the active collection
    async fn archive_order(&self, order_id: &str) -> ClientResult<()>;

    /// Archived orders
    async fn fetch_history(&self) -> ClientResult<Vec<ApiOrder>>;
}

/// Durable product operations
#[async_trait]
pub trait ProductService: Send + Sync {
    async fn fetch_products(&self) -> ClientResult<Vec<ApiProduct>>;

    async fn create_product(&self, draft: &ProductDraft) -> ClientResult<ApiProduct>;

    async fn update_product(&self, id: &str, patch: &ProductPatch) -> ClientResult<ApiProduct>;

    async fn delete_product(&self, id: &str) -> ClientResult<()>;
}
