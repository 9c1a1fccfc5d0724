//! In-process backend
//!
//! Implements both service traits over plain memory and mirrors the active
//! order collection onto a [`MemoryHub`] topic after every write, the way
//! the realtime database pushes it to connected stations. Failure switches
//! let tests exercise the unsynced paths.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared::order::BackendOrderStatus;
use shared::remote::{
    ApiOrder, ApiOrderItem, ApiProduct, CreateOrderRequest, Price, ProductDraft, ProductPatch,
};
use shared::util::{now_millis, to_rfc3339};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use uuid::Uuid;

use super::{OrderService, ProductService};
use crate::channel::MemoryHub;
use crate::config::DEFAULT_CURRENCY;
use crate::{ClientError, ClientResult};

#[derive(Default)]
struct Collections {
    active: Vec<ApiOrder>,
    archived: Vec<ApiOrder>,
    products: Vec<ApiProduct>,
}

/// Call counters
#[derive(Debug, Default)]
pub struct CallCounts {
    pub create: AtomicU32,
    pub update: AtomicU32,
    pub archive: AtomicU32,
}

/// Simulated order and product backend
pub struct SimulatedBackend {
    hub: MemoryHub,
    orders_topic: String,
    products_topic: Option<String>,
    data: Mutex<Collections>,
    fail_create: AtomicBool,
    fail_update: AtomicBool,
    fail_archive: AtomicBool,
    calls: CallCounts,
}

impl std::fmt::Debug for SimulatedBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedBackend")
            .field("orders_topic", &self.orders_topic)
            .field("products_topic", &self.products_topic)
            .finish_non_exhaustive()
    }
}

impl SimulatedBackend {
    pub fn new(hub: MemoryHub, orders_topic: impl Into<String>) -> Self {
        let backend = Self {
            hub,
            orders_topic: orders_topic.into(),
            products_topic: None,
            data: Mutex::new(Collections::default()),
            fail_create: AtomicBool::new(false),
            fail_update: AtomicBool::new(false),
            fail_archive: AtomicBool::new(false),
            calls: CallCounts::default(),
        };
        backend.publish_orders(&backend.data.lock());
        backend
    }

    /// Also mirror the product catalog onto `topic`
    pub fn with_products_topic(mut self, topic: impl Into<String>) -> Self {
        self.products_topic = Some(topic.into());
        self.publish_products(&self.data.lock());
        self
    }

    pub fn hub(&self) -> &MemoryHub {
        &self.hub
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_update(&self, fail: bool) {
        self.fail_update.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_archive(&self, fail: bool) {
        self.fail_archive.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> &CallCounts {
        &self.calls
    }

    pub fn active_orders(&self) -> Vec<ApiOrder> {
        self.data.lock().active.clone()
    }

    pub fn archived_orders(&self) -> Vec<ApiOrder> {
        self.data.lock().archived.clone()
    }

    /// Insert or replace an active order, as another station would
    pub fn put_order(&self, order: ApiOrder) {
        let mut data = self.data.lock();
        match data.active.iter_mut().find(|o| o.id == order.id) {
            Some(existing) => *existing = order,
            None => data.active.push(order),
        }
        self.publish_orders(&data);
    }

    /// Seed the catalog
    pub fn put_product(&self, product: ApiProduct) {
        let mut data = self.data.lock();
        match data.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => data.products.push(product),
        }
        self.publish_products(&data);
    }

    fn publish_orders(&self, data: &Collections) {
        let values = data
            .active
            .iter()
            .filter_map(|order| serde_json::to_value(order).ok())
            .collect();
        self.hub.publish(&self.orders_topic, values);
    }

    fn publish_products(&self, data: &Collections) {
        let Some(topic) = &self.products_topic else {
            return;
        };
        let values = data
            .products
            .iter()
            .filter_map(|product| serde_json::to_value(product).ok())
            .collect();
        self.hub.publish(topic, values);
    }

    fn unavailable(operation: &str) -> ClientError {
        ClientError::Internal(format!("{} failed: backend unavailable", operation))
    }
}

fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

#[async_trait]
impl OrderService for SimulatedBackend {
    async fn create_order(&self, request: &CreateOrderRequest) -> ClientResult<ApiOrder> {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(Self::unavailable("create order"));
        }

        let mut data = self.data.lock();
        let items: Vec<ApiOrderItem> = request
            .items
            .iter()
            .map(|line| {
                let product = data.products.iter().find(|p| p.id == line.product_id);
                ApiOrderItem {
                    product_id: line.product_id.clone(),
                    name: product.map(|p| p.name.clone()).unwrap_or_default(),
                    quantity: line.quantity,
                    unit_price: product.map_or(0.0, |p| p.price.value),
                    ingredients: product.map(|p| p.ingredients.clone()),
                    special_instructions: line.special_instructions.clone(),
                    category: product.and_then(|p| p.category.clone()),
                }
            })
            .collect();
        let total = items
            .iter()
            .map(|item| item.unit_price * f64::from(item.quantity))
            .sum();

        let now = to_rfc3339(now_millis());
        let order = ApiOrder {
            id: new_id("ord"),
            waiter_id: request.waiter_id.clone(),
            table_number: request.table_number,
            items,
            total_amount: Price::new(DEFAULT_CURRENCY, total),
            status: BackendOrderStatus::Pending,
            customer_preferences: request
                .customer_preferences
                .as_ref()
                .and_then(|prefs| serde_json::to_value(prefs).ok()),
            created_at: now.clone(),
            updated_at: now,
        };

        data.active.push(order.clone());
        self.publish_orders(&data);
        tracing::debug!(order_id = %order.id, "Simulated order created");
        Ok(order)
    }

    async fn update_status(
        &self,
        order_id: &str,
        status: BackendOrderStatus,
    ) -> ClientResult<ApiOrder> {
        self.calls.update.fetch_add(1, Ordering::SeqCst);
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(Self::unavailable("update status"));
        }

        let mut data = self.data.lock();
        let Some(order) = data.active.iter_mut().find(|o| o.id == order_id) else {
            return Err(ClientError::NotFound(format!("order {}", order_id)));
        };
        order.status = status;
        order.updated_at = to_rfc3339(now_millis());
        let updated = order.clone();

        self.publish_orders(&data);
        Ok(updated)
    }

    async fn archive_order(&self, order_id: &str) -> ClientResult<()> {
        self.calls.archive.fetch_add(1, Ordering::SeqCst);
        if self.fail_archive.load(Ordering::SeqCst) {
            return Err(Self::unavailable("archive order"));
        }

        let mut data = self.data.lock();
        let Some(index) = data.active.iter().position(|o| o.id == order_id) else {
            return Err(ClientError::NotFound(format!("order {}", order_id)));
        };
        let order = data.active.remove(index);
        data.archived.push(order);

        self.publish_orders(&data);
        Ok(())
    }

    async fn fetch_history(&self) -> ClientResult<Vec<ApiOrder>> {
        Ok(self.data.lock().archived.clone())
    }
}

#[async_trait]
impl ProductService for SimulatedBackend {
    async fn fetch_products(&self) -> ClientResult<Vec<ApiProduct>> {
        Ok(self.data.lock().products.clone())
    }

    async fn create_product(&self, draft: &ProductDraft) -> ClientResult<ApiProduct> {
        let product = ApiProduct {
            id: new_id("prod"),
            name: draft.name.clone(),
            description: draft.description.clone(),
            ingredients: draft.ingredients.clone(),
            price: draft.price.clone(),
            images: draft.images.clone(),
            is_available: Some(draft.is_available),
            category: draft.category.clone(),
        };

        let mut data = self.data.lock();
        data.products.push(product.clone());
        self.publish_products(&data);
        Ok(product)
    }

    async fn update_product(&self, id: &str, patch: &ProductPatch) -> ClientResult<ApiProduct> {
        let mut data = self.data.lock();
        let Some(product) = data.products.iter_mut().find(|p| p.id == id) else {
            return Err(ClientError::NotFound(format!("product {}", id)));
        };

        if let Some(name) = &patch.name {
            product.name = name.clone();
        }
        if let Some(description) = &patch.description {
            product.description = description.clone();
        }
        if let Some(ingredients) = &patch.ingredients {
            product.ingredients = ingredients.clone();
        }
        if let Some(price) = &patch.price {
            product.price = price.clone();
        }
        if let Some(images) = &patch.images {
            product.images = images.clone();
        }
        if let Some(available) = patch.is_available {
            product.is_available = Some(available);
        }
        if let Some(category) = &patch.category {
            product.category = Some(category.clone());
        }
        let updated = product.clone();

        self.publish_products(&data);
        Ok(updated)
    }

    async fn delete_product(&self, id: &str) -> ClientResult<()> {
        let mut data = self.data.lock();
        let before = data.products.len();
        data.products.retain(|p| p.id != id);
        if data.products.len() == before {
            return Err(ClientError::NotFound(format!("product {}", id)));
        }
        self.publish_products(&data);
        Ok(())
    }
}
