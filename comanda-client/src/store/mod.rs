//! Order store
//!
//! Holds the client's view of the cart, the open orders and the menu.
//!
//! # Consistency model
//!
//! ```text
//! create_order / update_order_status
//!     ├─ 1. Optimistic local edit (visible immediately)
//!     ├─ 2. Durable call to the OrderService
//!     └─ 3. Snapshot from the push channel replaces the order set
//! ```
//!
//! Snapshots are authoritative: an optimistic edit stays visible only until
//! the next snapshot, which wins for every order it carries. The one
//! exception is a status the backend cannot tell apart from the local one
//! (`ready` and `completed` are both `FINISHED`), where the local status stays. A freshly placed
//! order is shown as a placeholder keyed by its client reference until a
//! snapshot carries it (matched by client reference or backend id).
//!
//! All state lives behind one `parking_lot` mutex that is never held across
//! an `.await`.

mod cart;
mod events;
mod menu;

pub use cart::Cart;
pub use events::{ChangeOrigin, OrderStoreEvent};
pub use menu::MenuIndex;

use parking_lot::Mutex;
use shared::auth::AuthState;
use shared::error::ErrorCode;
use shared::models::{MenuItem, MenuItemPatch, NotificationType};
use shared::order::adapter::{
    api_order_to_order, api_product_to_menu_item, cart_to_create_order_request,
    menu_item_patch_to_product_patch, menu_item_to_draft,
};
use shared::order::{Customer, LineItem, Order, OrderStatus, UNCATEGORIZED};
use shared::remote::{ApiOrder, ApiProduct};
use shared::types::Amount;
use shared::util::short_id;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{broadcast, watch};
use uuid::Uuid;

use crate::channel::SnapshotUpdate;
use crate::notification::{Clock, NotificationCenter};
use crate::remote::{OrderService, ProductService};
use crate::storage::{PersistedCache, keys};
use crate::ClientResult;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Prefix of client-generated order references
pub const CLIENT_REF_PREFIX: &str = "local-";

/// Notification to raise once the state lock is released
enum Pending {
    NewOrder { order_id: String, customer: String },
    StatusUpdate { order_id: String, status: OrderStatus },
}

struct StoreState {
    cart: Cart,
    orders: Vec<Order>,
    menu: MenuIndex,
    /// Client refs of placeholders no snapshot has carried yet
    pending_refs: HashSet<String>,
    archive_failures: HashSet<String>,
    /// Orders a snapshot reported completed that this station never archived
    remote_completions: HashSet<String>,
    last_sequence: Option<u64>,
    reconciled_once: bool,
    auth: AuthState,
}

struct StoreInner {
    state: Mutex<StoreState>,
    cache: PersistedCache,
    orders_api: Arc<dyn OrderService>,
    products_api: Arc<dyn ProductService>,
    notifications: Arc<NotificationCenter>,
    clock: Arc<dyn Clock>,
    currency: String,
    closed: AtomicBool,
    events: broadcast::Sender<OrderStoreEvent>,
    orders_tx: watch::Sender<Vec<Order>>,
    cart_tx: watch::Sender<Vec<LineItem>>,
    menu_tx: watch::Sender<Vec<MenuItem>>,
}

/// Client-side order store
#[derive(Clone)]
pub struct OrderStore {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for OrderStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("OrderStore")
            .field("orders", &state.orders.len())
            .field("cart_lines", &state.cart.lines().len())
            .field("menu_items", &state.menu.items().len())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl OrderStore {
    /// Create a store, restoring cart, orders, menu and auth state from the
    /// persisted cache
    pub fn new(
        cache: PersistedCache,
        orders_api: Arc<dyn OrderService>,
        products_api: Arc<dyn ProductService>,
        notifications: Arc<NotificationCenter>,
        clock: Arc<dyn Clock>,
        currency: impl Into<String>,
    ) -> Self {
        let cart = Cart::new(cache.load_or_default(keys::CART));
        let orders: Vec<Order> = cache.load_or_default(keys::ORDERS);
        let menu_items: Vec<MenuItem> = cache.load_or_default(keys::MENU_ITEMS);
        let overrides: BTreeMap<String, String> = cache.load_or_default(keys::PRODUCT_CATEGORIES);
        let auth: AuthState = cache.load_or_default(keys::AUTH_STATE);

        // Placeholders the backend never acknowledged keep their client ref as id
        let pending_refs = orders
            .iter()
            .filter_map(|order| order.client_ref.as_ref())
            .filter(|client_ref| orders.iter().any(|o| &o.id == *client_ref))
            .cloned()
            .collect();

        let menu = MenuIndex::new(menu_items, overrides);
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (orders_tx, _) = watch::channel(orders.clone());
        let (cart_tx, _) = watch::channel(cart.lines().to_vec());
        let (menu_tx, _) = watch::channel(menu.items().to_vec());

        tracing::debug!(
            orders = orders.len(),
            cart_lines = cart.lines().len(),
            menu_items = menu.items().len(),
            "Order store restored"
        );

        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(StoreState {
                    cart,
                    orders,
                    menu,
                    pending_refs,
                    archive_failures: HashSet::new(),
                    remote_completions: HashSet::new(),
                    last_sequence: None,
                    reconciled_once: false,
                    auth,
                }),
                cache,
                orders_api,
                products_api,
                notifications,
                clock,
                currency: currency.into(),
                closed: AtomicBool::new(false),
                events,
                orders_tx,
                cart_tx,
                menu_tx,
            }),
        }
    }

    // ========== Cart ==========

    /// Add a line, merging it with an identical one
    pub fn add_to_cart(&self, line: LineItem) {
        let mut state = self.inner.state.lock();
        state.cart.add(line);
        self.save_cart(&state.cart);
    }

    pub fn remove_from_cart(&self, item_id: &str) {
        let mut state = self.inner.state.lock();
        if state.cart.remove(item_id) {
            self.save_cart(&state.cart);
        }
    }

    /// Set a product's quantity; zero or less removes it
    pub fn update_cart_item_quantity(&self, item_id: &str, quantity: i64) {
        let mut state = self.inner.state.lock();
        if state.cart.update_quantity(item_id, quantity) {
            self.save_cart(&state.cart);
        }
    }

    pub fn clear_cart(&self) {
        let mut state = self.inner.state.lock();
        state.cart.clear();
        self.save_cart(&state.cart);
    }

    pub fn current_cart(&self) -> Vec<LineItem> {
        self.inner.state.lock().cart.lines().to_vec()
    }

    pub fn cart_total(&self) -> Amount {
        self.inner.state.lock().cart.total()
    }

    pub fn cart_item_count(&self) -> u32 {
        self.inner.state.lock().cart.item_count()
    }

    // ========== Orders ==========

    /// Place an order from the current cart
    ///
    /// No-op (returns `None`) when the cart is empty or the store is closed.
    /// The cart is cleared and a placeholder order is visible before the
    /// backend is called. If the call fails the placeholder stays as an
    /// offline order.
    pub async fn create_order(&self, customer: Customer) -> Option<Order> {
        let now = self.inner.clock.now_millis();
        let client_ref = new_client_ref(now);

        let (placeholder, request) = {
            let mut state = self.inner.state.lock();
            if self.is_closed() {
                return None;
            }
            if state.cart.is_empty() {
                tracing::debug!(code = %ErrorCode::EmptyCart, "Ignoring checkout of an empty cart");
                return None;
            }

            let items = state.cart.take();
            let request = cart_to_create_order_request(
                &items,
                &customer,
                state.auth.waiter_id(),
                Some(&client_ref),
            );
            let placeholder = Order::from_cart(client_ref.clone(), customer, items, now)
                .with_client_ref(client_ref.clone());

            state.orders.push(placeholder.clone());
            state.pending_refs.insert(client_ref.clone());
            self.save_cart(&state.cart);
            self.save_orders(&state.orders);
            (placeholder, request)
        };

        tracing::info!(
            client_ref = %client_ref,
            items = placeholder.items.len(),
            total = placeholder.total,
            "Order placed"
        );

        let result = self.inner.orders_api.create_order(&request).await;
        if self.is_closed() {
            return Some(placeholder);
        }

        match result {
            Ok(api_order) => {
                let order_id = api_order.id.clone();
                let order = {
                    let mut state = self.inner.state.lock();
                    let is_placeholder = |o: &Order| {
                        o.id == client_ref && o.client_ref.as_ref() == Some(&client_ref)
                    };

                    // A snapshot may have carried the order before the response
                    let existing = state.orders.iter().find(|o| o.id == order_id).cloned();
                    let order = if let Some(existing) = existing {
                        state.orders.retain(|o| !is_placeholder(o));
                        state.pending_refs.remove(&client_ref);
                        Some(existing)
                    } else {
                        state.orders.iter_mut().find(|o| is_placeholder(&**o)).map(|order| {
                            order.id = order_id.clone();
                            order.clone()
                        })
                    };
                    self.save_orders(&state.orders);
                    order
                };

                tracing::info!(order_id = %order_id, client_ref = %client_ref, "Order created");
                self.inner
                    .notifications
                    .notify_new_order(&order_id, &placeholder.customer.name);
                self.emit(OrderStoreEvent::OrderPlaced {
                    order_id: order_id.clone(),
                    client_ref,
                    synced: true,
                });
                Some(order.unwrap_or_else(|| {
                    let mut order = placeholder;
                    order.id = order_id;
                    order
                }))
            }
            Err(e) => {
                tracing::warn!(
                    client_ref = %client_ref,
                    code = %ErrorCode::OrderCreateFailed,
                    cause = %e.code(),
                    error = %e,
                    "Failed to create order, keeping it offline"
                );
                self.inner
                    .notifications
                    .notify_new_order(&client_ref, &placeholder.customer.name);
                self.inner.notifications.notify(
                    NotificationType::Warning,
                    "Order not synced",
                    format!(
                        "Order #{} is only stored on this station",
                        short_id(&client_ref)
                    ),
                    Some(&client_ref),
                );
                self.emit(OrderStoreEvent::OrderPlaced {
                    order_id: client_ref.clone(),
                    client_ref,
                    synced: false,
                });
                Some(placeholder)
            }
        }
    }

    /// Advance an order's status
    ///
    /// Applied locally first, then sent to the backend. Completing an order
    /// also archives it. Unknown orders, terminal orders and same-status
    /// transitions are ignored, except that completing an order a snapshot
    /// already reported completed archives it. Returns whether anything was
    /// applied.
    pub async fn update_order_status(&self, order_id: &str, status: OrderStatus) -> bool {
        let from = {
            let mut state = self.inner.state.lock();
            if self.is_closed() {
                return false;
            }

            let completed_upstream = state.remote_completions.contains(order_id);
            let Some(order) = state.orders.iter_mut().find(|o| o.id == order_id) else {
                tracing::warn!(order_id, code = %ErrorCode::OrderNotFound, "Status update for unknown order ignored");
                return false;
            };
            if order.status == OrderStatus::Completed
                && status == OrderStatus::Completed
                && completed_upstream
            {
                None
            } else if order.status.is_terminal() {
                tracing::warn!(
                    order_id,
                    code = %ErrorCode::OrderTerminal,
                    status = %order.status,
                    "Order already closed, status update ignored"
                );
                return false;
            } else if order.status == status {
                tracing::debug!(order_id, status = %status, "Order already in requested status");
                return false;
            } else {
                let from = std::mem::replace(&mut order.status, status);
                self.save_orders(&state.orders);
                Some(from)
            }
        };

        // Completed upstream without being archived: only the archive is left
        let Some(from) = from else {
            tracing::info!(order_id, "Archiving order completed upstream");
            self.archive(order_id).await;
            return true;
        };

        tracing::info!(order_id, from = %from, to = %status, "Order status changed");
        self.inner.notifications.notify_status_update(order_id, status);
        self.emit(OrderStoreEvent::StatusChanged {
            order_id: order_id.to_string(),
            from,
            to: status,
            origin: ChangeOrigin::Local,
        });

        if let Err(e) = self
            .inner
            .orders_api
            .update_status(order_id, status.to_backend())
            .await
        {
            if e.is_transient() {
                tracing::warn!(
                    order_id,
                    status = %status.to_backend(),
                    code = %ErrorCode::StatusUpdateFailed,
                    cause = %e.code(),
                    error = %e,
                    "Failed to update order status"
                );
            } else {
                tracing::error!(
                    order_id,
                    status = %status.to_backend(),
                    code = %ErrorCode::StatusUpdateFailed,
                    cause = %e.code(),
                    error = %e,
                    "Backend rejected order status update"
                );
            }
            return true;
        }

        if status == OrderStatus::Completed && !self.is_closed() {
            self.archive(order_id).await;
        }
        true
    }

    /// Archive a completed order; failures are recorded, not retried
    async fn archive(&self, order_id: &str) {
        match self.inner.orders_api.archive_order(order_id).await {
            Ok(()) => {
                tracing::info!(order_id, "Order archived");
                let mut state = self.inner.state.lock();
                state.archive_failures.remove(order_id);
                state.remote_completions.remove(order_id);
            }
            Err(e) => {
                if self.is_closed() {
                    return;
                }
                tracing::error!(
                    order_id,
                    code = %ErrorCode::ArchiveFailed,
                    cause = %e.code(),
                    error = %e,
                    "Failed to archive order"
                );
                self.inner.state.lock().archive_failures.insert(order_id.to_string());
                self.inner.notifications.notify(
                    NotificationType::Error,
                    "Archive failed",
                    format!(
                        "Order #{} is completed but could not be archived",
                        short_id(order_id)
                    ),
                    Some(order_id),
                );
                self.emit(OrderStoreEvent::ArchiveFailed {
                    order_id: order_id.to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    /// Whether archiving this order failed and it has not left the active set yet
    pub fn archive_failed(&self, order_id: &str) -> bool {
        self.inner.state.lock().archive_failures.contains(order_id)
    }

    /// Apply a push channel delivery of the active orders topic
    ///
    /// Error deliveries and stale sequences are ignored.
    pub fn apply_snapshot(&self, update: &SnapshotUpdate) {
        if let Some(error) = &update.error {
            tracing::warn!(topic = %update.topic, error = %error, "Keeping orders after upstream error");
            return;
        }

        let orders: Vec<Order> = update
            .data
            .iter()
            .filter_map(|value| match serde_json::from_value::<ApiOrder>(value.clone()) {
                Ok(record) => Some(api_order_to_order(&record)),
                Err(e) => {
                    tracing::warn!(topic = %update.topic, error = %e, "Skipping malformed order record");
                    None
                }
            })
            .collect();

        self.reconcile_at(Some(update.sequence), orders);
    }

    /// Replace the order set with a snapshot
    ///
    /// A local `ready` survives a snapshot saying `completed`: the backend
    /// stores both as `FINISHED`, so that is the echo of the local change.
    pub fn reconcile(&self, snapshot: &[Order]) {
        self.reconcile_at(None, snapshot.to_vec());
    }

    fn reconcile_at(&self, sequence: Option<u64>, mut orders: Vec<Order>) {
        if self.is_closed() {
            return;
        }

        let mut pending = Vec::new();
        let count = {
            let mut state = self.inner.state.lock();

            if let (Some(seq), Some(last)) = (sequence, state.last_sequence) {
                if seq <= last {
                    tracing::debug!(sequence = seq, last, "Ignoring stale snapshot");
                    return;
                }
            }

            for item in orders.iter_mut().flat_map(|order| order.items.iter_mut()) {
                item.category = state
                    .menu
                    .category_for(&item.id)
                    .map(str::to_string)
                    .or_else(|| Some(item.category.clone()).filter(|c| !c.is_empty()))
                    .unwrap_or_else(|| UNCATEGORIZED.to_string());
            }

            let notify = state.reconciled_once;
            let mut matched_refs = Vec::new();
            let mut remote_completions = Vec::new();

            for order in orders.iter_mut() {
                let previous = state.orders.iter().find(|local| {
                    local.id == order.id
                        || matches!(
                            (&local.client_ref, &order.client_ref),
                            (Some(a), Some(b)) if a == b && state.pending_refs.contains(a)
                        )
                });

                if let Some(client_ref) = &order.client_ref {
                    if state.pending_refs.contains(client_ref) {
                        matched_refs.push(client_ref.clone());
                    }
                }

                if let Some(local) = previous {
                    if local.status != order.status
                        && local.status.to_backend() == order.status.to_backend()
                    {
                        order.status = local.status;
                    }
                }
                if order.status == OrderStatus::Completed
                    && previous.is_none_or(|local| local.status != OrderStatus::Completed)
                {
                    remote_completions.push(order.id.clone());
                }

                match previous {
                    None if notify => pending.push(Pending::NewOrder {
                        order_id: order.id.clone(),
                        customer: order.customer.name.clone(),
                    }),
                    Some(local) if local.status != order.status => {
                        if notify {
                            pending.push(Pending::StatusUpdate {
                                order_id: order.id.clone(),
                                status: order.status,
                            });
                        }
                        self.emit(OrderStoreEvent::StatusChanged {
                            order_id: order.id.clone(),
                            from: local.status,
                            to: order.status,
                            origin: ChangeOrigin::Remote,
                        });
                    }
                    _ => {}
                }
            }

            // Placeholders matched by backend id as well
            for local in &state.orders {
                if let Some(client_ref) = &local.client_ref {
                    if state.pending_refs.contains(client_ref)
                        && orders.iter().any(|o| o.id == local.id)
                    {
                        matched_refs.push(client_ref.clone());
                    }
                }
            }
            for client_ref in matched_refs {
                state.pending_refs.remove(&client_ref);
            }

            // Placeholders not carried yet stay visible
            let unmatched: Vec<Order> = state
                .orders
                .iter()
                .filter(|local| {
                    local
                        .client_ref
                        .as_ref()
                        .is_some_and(|r| state.pending_refs.contains(r))
                        && !orders.iter().any(|o| o.id == local.id)
                })
                .cloned()
                .collect();
            orders.extend(unmatched);

            state
                .archive_failures
                .retain(|id| orders.iter().any(|o| &o.id == id));
            state
                .remote_completions
                .retain(|id| orders.iter().any(|o| &o.id == id));
            state.remote_completions.extend(remote_completions);

            state.orders = orders;
            state.last_sequence = sequence.or(state.last_sequence);
            state.reconciled_once = true;
            self.save_orders(&state.orders);
            state.orders.len()
        };

        tracing::debug!(orders = count, ?sequence, "Orders reconciled");

        for notification in pending {
            match notification {
                Pending::NewOrder { order_id, customer } => {
                    self.inner.notifications.notify_new_order(&order_id, &customer);
                }
                Pending::StatusUpdate { order_id, status } => {
                    self.inner.notifications.notify_status_update(&order_id, status);
                }
            }
        }

        self.emit(OrderStoreEvent::OrdersReconciled {
            sequence: sequence.unwrap_or_default(),
            count,
        });
    }

    pub fn current_orders(&self) -> Vec<Order> {
        self.inner.state.lock().orders.clone()
    }

    pub fn order(&self, order_id: &str) -> Option<Order> {
        self.inner
            .state
            .lock()
            .orders
            .iter()
            .find(|o| o.id == order_id)
            .cloned()
    }

    /// Archived orders from the backend
    pub async fn fetch_history(&self) -> ClientResult<Vec<Order>> {
        let records = self.inner.orders_api.fetch_history().await?;
        Ok(records.iter().map(api_order_to_order).collect())
    }

    // ========== Menu ==========

    /// Load the menu from the backend, keeping the cached one on failure
    pub async fn refresh_menu(&self) -> bool {
        match self.inner.products_api.fetch_products().await {
            Ok(products) => {
                self.apply_products(&products);
                tracing::info!(count = products.len(), "Products loaded from backend");
                true
            }
            Err(e) => {
                tracing::warn!(code = %e.code(), error = %e, "Failed to load products, keeping cached menu");
                false
            }
        }
    }

    /// Apply a push channel delivery of the products topic
    ///
    /// Error and empty deliveries keep the current menu.
    pub fn apply_products_snapshot(&self, update: &SnapshotUpdate) {
        if update.is_error() || update.data.is_empty() {
            return;
        }

        let products: Vec<ApiProduct> = update
            .data
            .iter()
            .filter_map(|value| serde_json::from_value(value.clone()).ok())
            .collect();
        self.apply_products(&products);
    }

    /// Replace the menu with backend products
    pub fn apply_products(&self, products: &[ApiProduct]) {
        let count = {
            let mut state = self.inner.state.lock();
            state
                .menu
                .replace(products.iter().map(api_product_to_menu_item).collect());
            self.save_menu(&state.menu);
            state.menu.items().len()
        };
        self.emit(OrderStoreEvent::MenuUpdated { count });
    }

    /// Create a product; its category is remembered locally
    pub async fn add_menu_item(&self, item: MenuItem) -> Option<MenuItem> {
        let draft = menu_item_to_draft(&item, &self.inner.currency);
        match self.inner.products_api.create_product(&draft).await {
            Ok(product) => {
                let created = {
                    let mut state = self.inner.state.lock();
                    if !item.category.is_empty() {
                        state.menu.set_override(&product.id, &item.category);
                        self.save_overrides(&state.menu);
                    }
                    state.menu.upsert(api_product_to_menu_item(&product));
                    self.save_menu(&state.menu);
                    state.menu.get(&product.id).cloned()
                };
                tracing::info!(product_id = %product.id, "Product created");
                created
            }
            Err(e) => {
                tracing::warn!(
                    name = %item.name,
                    code = %ErrorCode::ProductSyncFailed,
                    cause = %e.code(),
                    error = %e,
                    "Failed to create product"
                );
                None
            }
        }
    }

    /// Update a product; the local copy and category override change first
    pub async fn update_menu_item(&self, item_id: &str, patch: MenuItemPatch) -> bool {
        {
            let mut state = self.inner.state.lock();
            if let Some(category) = &patch.category {
                state.menu.set_override(item_id, category);
                self.save_overrides(&state.menu);
            }
            match state.menu.get_mut(item_id) {
                Some(item) => patch.apply_to(item),
                None => tracing::debug!(
                    product_id = item_id,
                    code = %ErrorCode::ProductNotFound,
                    "Product missing from the local menu"
                ),
            }
            self.save_menu(&state.menu);
        }

        let product_patch = menu_item_patch_to_product_patch(&patch, &self.inner.currency);
        match self
            .inner
            .products_api
            .update_product(item_id, &product_patch)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(
                    product_id = item_id,
                    code = %ErrorCode::ProductSyncFailed,
                    cause = %e.code(),
                    error = %e,
                    "Failed to update product"
                );
                false
            }
        }
    }

    pub async fn delete_menu_item(&self, item_id: &str) -> bool {
        {
            let mut state = self.inner.state.lock();
            state.menu.remove_override(item_id);
            state.menu.remove(item_id);
            self.save_overrides(&state.menu);
            self.save_menu(&state.menu);
        }

        match self.inner.products_api.delete_product(item_id).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    product_id = item_id,
                    code = %ErrorCode::ProductSyncFailed,
                    cause = %e.code(),
                    error = %e,
                    "Failed to delete product"
                );
                false
            }
        }
    }

    pub fn current_menu_items(&self) -> Vec<MenuItem> {
        self.inner.state.lock().menu.items().to_vec()
    }

    pub fn menu_item(&self, item_id: &str) -> Option<MenuItem> {
        self.inner.state.lock().menu.get(item_id).cloned()
    }

    // ========== Session ==========

    pub fn set_auth_state(&self, auth: AuthState) {
        self.inner.cache.persist(keys::AUTH_STATE, &auth);
        self.inner.state.lock().auth = auth;
    }

    pub fn auth_state(&self) -> AuthState {
        self.inner.state.lock().auth.clone()
    }

    /// Stop accepting work; late completions become no-ops
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    // ========== Observers ==========

    pub fn events(&self) -> broadcast::Receiver<OrderStoreEvent> {
        self.inner.events.subscribe()
    }

    pub fn subscribe_orders(&self) -> watch::Receiver<Vec<Order>> {
        self.inner.orders_tx.subscribe()
    }

    pub fn subscribe_cart(&self) -> watch::Receiver<Vec<LineItem>> {
        self.inner.cart_tx.subscribe()
    }

    pub fn subscribe_menu(&self) -> watch::Receiver<Vec<MenuItem>> {
        self.inner.menu_tx.subscribe()
    }

    // ========== Internals (called with the state lock held) ==========

    fn save_cart(&self, cart: &Cart) {
        self.inner.cache.persist(keys::CART, cart);
        self.inner.cart_tx.send_replace(cart.lines().to_vec());
    }

    fn save_orders(&self, orders: &[Order]) {
        self.inner.cache.persist(keys::ORDERS, orders);
        self.inner.orders_tx.send_replace(orders.to_vec());
    }

    fn save_menu(&self, menu: &MenuIndex) {
        self.inner.cache.persist(keys::MENU_ITEMS, menu.items());
        self.inner.menu_tx.send_replace(menu.items().to_vec());
    }

    fn save_overrides(&self, menu: &MenuIndex) {
        self.inner.cache.persist(keys::PRODUCT_CATEGORIES, menu.overrides());
    }

    fn emit(&self, event: OrderStoreEvent) {
        // No receivers is fine
        let _ = self.inner.events.send(event);
    }
}

/// `local-<unix millis>-<8 hex>`
fn new_client_ref(now: i64) -> String {
    format!(
        "{}{}-{}",
        CLIENT_REF_PREFIX,
        now,
        &Uuid::new_v4().simple().to_string()[..8]
    )
}
