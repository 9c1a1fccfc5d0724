// comanda-client/tests/order_flow.rs
// Cart → order → status → archive flows against the simulated backend

use comanda_client::billing::BillingService;
use comanda_client::channel::MemoryHub;
use comanda_client::notification::{LogAlertSink, ManualClock, NotificationCenter};
use async_trait::async_trait;
use comanda_client::remote::{OrderService, SimulatedBackend};
use comanda_client::storage::{MemoryStore, PersistedCache, keys};
use comanda_client::store::{OrderStore, OrderStoreEvent};
use comanda_client::{ClientConfig, ClientResult, Engine, SnapshotUpdate};
use shared::models::{MenuItemPatch, NotificationType, StoreInfo};
use shared::order::{BackendOrderStatus, Customer, LineItem, Order, OrderStatus, UNCATEGORIZED};
use shared::remote::{ApiOrder, ApiOrderItem, ApiProduct, CreateOrderRequest, CustomerPreferences, Price};
use shared::util::to_rfc3339;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

const TOPIC: &str = "pedidos_activos";
// 2024-03-10T12:00:00Z
const START: i64 = 1_710_072_000_000;

struct Station {
    store: OrderStore,
    backend: Arc<SimulatedBackend>,
    notifications: Arc<NotificationCenter>,
    clock: Arc<ManualClock>,
    cache: PersistedCache,
}

fn product(id: &str, name: &str, price: f64, category: Option<&str>) -> ApiProduct {
    ApiProduct {
        id: id.into(),
        name: name.into(),
        description: String::new(),
        ingredients: vec![],
        price: Price::new("MXN", price),
        images: vec![],
        is_available: Some(true),
        category: category.map(str::to_string),
    }
}

fn api_item(product_id: &str, name: &str, price: f64, quantity: u32) -> ApiOrderItem {
    ApiOrderItem {
        product_id: product_id.into(),
        name: name.into(),
        quantity,
        unit_price: price,
        ingredients: None,
        special_instructions: None,
        category: None,
    }
}

fn api_order(
    id: &str,
    customer: &str,
    status: BackendOrderStatus,
    client_ref: Option<&str>,
    items: Vec<ApiOrderItem>,
) -> ApiOrder {
    let total = items
        .iter()
        .map(|item| item.unit_price * f64::from(item.quantity))
        .sum();
    let prefs = CustomerPreferences {
        name: customer.into(),
        phone: "555".into(),
        notes: None,
        client_ref: client_ref.map(str::to_string),
    };
    ApiOrder {
        id: id.into(),
        waiter_id: "anonymous".into(),
        table_number: 0,
        items,
        total_amount: Price::new("MXN", total),
        status,
        customer_preferences: Some(serde_json::to_value(prefs).unwrap()),
        created_at: to_rfc3339(START),
        updated_at: to_rfc3339(START),
    }
}

fn snapshot(sequence: u64, orders: &[ApiOrder]) -> SnapshotUpdate {
    SnapshotUpdate {
        topic: TOPIC.into(),
        sequence,
        data: orders
            .iter()
            .map(|order| serde_json::to_value(order).unwrap())
            .collect(),
        error: None,
    }
}

fn station_with_cache(cache: PersistedCache) -> Station {
    let clock = Arc::new(ManualClock::new(START));
    let backend = Arc::new(SimulatedBackend::new(MemoryHub::new(), TOPIC));
    backend.put_product(product("p1", "Burger", 10.0, Some("mains")));
    backend.put_product(product("p2", "Fries", 5.0, None));

    let notifications = Arc::new(NotificationCenter::new(
        cache.clone(),
        clock.clone(),
        Arc::new(LogAlertSink),
    ));
    let store = OrderStore::new(
        cache.clone(),
        backend.clone(),
        backend.clone(),
        notifications.clone(),
        clock.clone(),
        "MXN",
    );

    Station {
        store,
        backend,
        notifications,
        clock,
        cache,
    }
}

async fn station() -> Station {
    let station = station_with_cache(PersistedCache::in_memory());
    assert!(station.store.refresh_menu().await);
    station
}

fn fill_cart(station: &Station) {
    let burger = station.store.menu_item("p1").unwrap();
    let fries = station.store.menu_item("p2").unwrap();
    station.store.add_to_cart(LineItem::from_menu_item(&burger, 2));
    station.store.add_to_cart(LineItem::from_menu_item(&fries, 1));
}

fn count(station: &Station, kind: NotificationType) -> usize {
    station
        .notifications
        .notifications()
        .iter()
        .filter(|n| n.kind == kind)
        .count()
}

#[tokio::test]
async fn test_checkout_and_invoice() {
    let station = station().await;
    fill_cart(&station);
    assert_eq!(station.store.cart_total(), 25.0);
    assert_eq!(station.store.cart_item_count(), 3);

    let order = station
        .store
        .create_order(Customer::new("Ana", "555-0101"))
        .await
        .unwrap();

    assert!(order.id.starts_with("ord-"));
    assert_eq!(order.total, 25.0);
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(station.store.current_cart().is_empty());
    assert_eq!(station.store.current_orders().len(), 1);

    // The backend echoes the correlation id back
    let active = station.backend.active_orders();
    assert_eq!(active.len(), 1);
    assert_eq!(
        active[0].customer_preferences.as_ref().unwrap()["clientRef"],
        order.client_ref.clone().unwrap()
    );

    let billing = BillingService::new(
        station.cache.clone(),
        station.clock.clone(),
        0.16,
        StoreInfo::default(),
    );
    let invoice = billing.generate_invoice(&order);
    assert!((invoice.subtotal - 21.55).abs() < 0.005);
    assert!((invoice.tax - 3.45).abs() < 0.005);
    assert_eq!(invoice.total, 25.0);
}

#[tokio::test]
async fn test_empty_cart_checkout_is_noop() {
    let station = station().await;
    assert!(station.store.create_order(Customer::new("Ana", "555")).await.is_none());
    assert_eq!(station.backend.calls().create.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_lifecycle_raises_three_notifications() {
    let station = station().await;
    fill_cart(&station);

    let order = station
        .store
        .create_order(Customer::new("Ana", "555"))
        .await
        .unwrap();
    station.clock.advance(Duration::from_secs(6));
    assert!(station.store.update_order_status(&order.id, OrderStatus::Preparing).await);
    station.clock.advance(Duration::from_secs(6));
    assert!(station.store.update_order_status(&order.id, OrderStatus::Ready).await);

    assert_eq!(station.notifications.notifications().len(), 3);
    assert_eq!(count(&station, NotificationType::NewOrder), 1);
    assert_eq!(count(&station, NotificationType::OrderUpdate), 2);

    // Ready is stored as FINISHED by the backend
    assert_eq!(
        station.backend.active_orders()[0].status,
        BackendOrderStatus::Finished
    );
    assert_eq!(station.store.order(&order.id).unwrap().status, OrderStatus::Ready);
}

#[tokio::test]
async fn test_lifecycle_survives_snapshot_echoes() {
    let station = station().await;
    fill_cart(&station);
    let order = station
        .store
        .create_order(Customer::new("Ana", "555"))
        .await
        .unwrap();
    station.store.apply_snapshot(&snapshot(1, &station.backend.active_orders()));

    for (sequence, status) in [(2, OrderStatus::Preparing), (3, OrderStatus::Ready)] {
        station.clock.advance(Duration::from_secs(6));
        assert!(station.store.update_order_status(&order.id, status).await);
        station
            .store
            .apply_snapshot(&snapshot(sequence, &station.backend.active_orders()));
        assert_eq!(station.store.order(&order.id).unwrap().status, status);
    }

    station.clock.advance(Duration::from_secs(6));
    assert!(station.store.update_order_status(&order.id, OrderStatus::Completed).await);
    assert!(station.backend.active_orders().is_empty());
    assert_eq!(station.backend.archived_orders().len(), 1);

    station.store.apply_snapshot(&snapshot(4, &station.backend.active_orders()));
    assert!(station.store.current_orders().is_empty());

    assert_eq!(station.notifications.notifications().len(), 4);
    assert_eq!(count(&station, NotificationType::NewOrder), 1);
    assert_eq!(count(&station, NotificationType::OrderUpdate), 3);
}

#[tokio::test]
async fn test_snapshot_ready_replaces_local_preparing() {
    let station = station().await;
    fill_cart(&station);
    let order = station
        .store
        .create_order(Customer::new("Ana", "555"))
        .await
        .unwrap();
    assert!(station.store.update_order_status(&order.id, OrderStatus::Preparing).await);

    let mut remote: Order = station.store.order(&order.id).unwrap();
    remote.status = OrderStatus::Ready;
    station.store.reconcile(&[remote]);

    assert_eq!(station.store.order(&order.id).unwrap().status, OrderStatus::Ready);
    assert_eq!(station.store.current_orders().len(), 1);
}

#[tokio::test]
async fn test_order_finished_upstream_can_be_archived() {
    let station = station().await;
    fill_cart(&station);
    let order = station
        .store
        .create_order(Customer::new("Ana", "555"))
        .await
        .unwrap();
    station.store.apply_snapshot(&snapshot(1, &station.backend.active_orders()));

    // Another station marks it ready; here it reads back as completed
    let mut record = station.backend.active_orders().remove(0);
    record.status = BackendOrderStatus::Finished;
    station.backend.put_order(record);
    station.store.apply_snapshot(&snapshot(2, &station.backend.active_orders()));
    assert_eq!(station.store.order(&order.id).unwrap().status, OrderStatus::Completed);

    assert!(station.store.update_order_status(&order.id, OrderStatus::Completed).await);
    assert!(station.backend.active_orders().is_empty());
    assert_eq!(station.backend.archived_orders().len(), 1);

    // Archived: completing again is a no-op
    assert!(!station.store.update_order_status(&order.id, OrderStatus::Completed).await);
    assert_eq!(station.backend.archived_orders().len(), 1);
}

/// Order service whose create response is held until released
struct HeldCreate {
    backend: Arc<SimulatedBackend>,
    release: Notify,
}

#[async_trait]
impl OrderService for HeldCreate {
    async fn create_order(&self, request: &CreateOrderRequest) -> ClientResult<ApiOrder> {
        let order = self.backend.create_order(request).await?;
        self.release.notified().await;
        Ok(order)
    }

    async fn update_status(
        &self,
        order_id: &str,
        status: BackendOrderStatus,
    ) -> ClientResult<ApiOrder> {
        self.backend.update_status(order_id, status).await
    }

    async fn archive_order(&self, order_id: &str) -> ClientResult<()> {
        self.backend.archive_order(order_id).await
    }

    async fn fetch_history(&self) -> ClientResult<Vec<ApiOrder>> {
        self.backend.fetch_history().await
    }
}

#[tokio::test]
async fn test_snapshot_before_create_response_keeps_one_order() {
    let base = station().await;
    let held = Arc::new(HeldCreate {
        backend: base.backend.clone(),
        release: Notify::new(),
    });
    let store = OrderStore::new(
        PersistedCache::in_memory(),
        held.clone(),
        base.backend.clone(),
        base.notifications.clone(),
        base.clock.clone(),
        "MXN",
    );
    assert!(store.refresh_menu().await);
    let burger = store.menu_item("p1").unwrap();
    store.add_to_cart(LineItem::from_menu_item(&burger, 1));

    let placing = tokio::spawn({
        let store = store.clone();
        async move { store.create_order(Customer::new("Ana", "555")).await }
    });

    for _ in 0..500 {
        if !base.backend.active_orders().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    // The record comes back without the correlation id
    let mut record = base.backend.active_orders().remove(0);
    record.customer_preferences = None;
    let order_id = record.id.clone();
    store.apply_snapshot(&snapshot(1, &[record]));
    assert_eq!(store.current_orders().len(), 2);

    held.release.notify_one();
    let order = placing.await.unwrap().unwrap();
    assert_eq!(order.id, order_id);

    let orders = store.current_orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, order_id);

    // Nothing left pending to resurrect
    store.apply_snapshot(&snapshot(2, &[]));
    assert!(store.current_orders().is_empty());
}

#[tokio::test]
async fn test_snapshot_status_wins_over_optimistic_edit() {
    let station = station().await;
    fill_cart(&station);
    let order = station
        .store
        .create_order(Customer::new("Ana", "555"))
        .await
        .unwrap();
    station.store.apply_snapshot(&snapshot(1, &station.backend.active_orders()));

    // Local edit that never reaches the backend
    station.backend.set_fail_update(true);
    assert!(station.store.update_order_status(&order.id, OrderStatus::Preparing).await);
    assert_eq!(station.store.order(&order.id).unwrap().status, OrderStatus::Preparing);

    // Another station marks it ready, which the backend stores as FINISHED
    let mut record = station.backend.active_orders().remove(0);
    record.status = OrderStatus::Ready.to_backend();
    station.backend.put_order(record);
    station.store.apply_snapshot(&snapshot(2, &station.backend.active_orders()));

    assert_eq!(station.store.order(&order.id).unwrap().status, OrderStatus::Completed);

    // The snapshot also wins when it moves an order back
    let mut record = station.backend.active_orders().remove(0);
    record.status = BackendOrderStatus::InProgress;
    station.backend.put_order(record);
    station.store.apply_snapshot(&snapshot(3, &station.backend.active_orders()));
    assert_eq!(station.store.order(&order.id).unwrap().status, OrderStatus::Preparing);
}

#[tokio::test]
async fn test_offline_placeholder_replaced_not_duplicated() {
    let station = station().await;
    station.backend.set_fail_create(true);
    fill_cart(&station);

    let placeholder = station
        .store
        .create_order(Customer::new("Ana", "555"))
        .await
        .unwrap();
    let client_ref = placeholder.client_ref.clone().unwrap();
    assert_eq!(placeholder.id, client_ref);
    assert!(client_ref.starts_with("local-"));
    assert_eq!(count(&station, NotificationType::NewOrder), 1);
    assert_eq!(count(&station, NotificationType::Warning), 1);

    // A snapshot without it keeps the placeholder visible
    station.store.apply_snapshot(&snapshot(1, &[]));
    assert_eq!(station.store.current_orders().len(), 1);

    // The order reaches the backend some other way, carrying the same ref
    let synced = api_order(
        "ord-42",
        "Ana",
        BackendOrderStatus::Pending,
        Some(&client_ref),
        vec![api_item("p1", "Burger", 10.0, 2), api_item("p2", "Fries", 5.0, 1)],
    );
    station.store.apply_snapshot(&snapshot(2, &[synced]));

    let orders = station.store.current_orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, "ord-42");
    // Matching the placeholder is not a new order
    assert_eq!(count(&station, NotificationType::NewOrder), 1);

    // Once matched it no longer survives snapshots that omit it
    station.store.apply_snapshot(&snapshot(3, &[]));
    assert!(station.store.current_orders().is_empty());
}

#[tokio::test]
async fn test_placeholder_matched_by_backend_id() {
    let station = station().await;
    fill_cart(&station);
    let order = station
        .store
        .create_order(Customer::new("Ana", "555"))
        .await
        .unwrap();

    // A record without the correlation id still matches by backend id
    let mut record = station.backend.active_orders().remove(0);
    record.customer_preferences = None;
    station.store.apply_snapshot(&snapshot(1, &[record]));

    let orders = station.store.current_orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, order.id);

    station.store.apply_snapshot(&snapshot(2, &[]));
    assert!(station.store.current_orders().is_empty());
}

#[tokio::test]
async fn test_completed_orders_are_archived() {
    let station = station().await;
    fill_cart(&station);
    let order = station
        .store
        .create_order(Customer::new("Ana", "555"))
        .await
        .unwrap();

    assert!(station.store.update_order_status(&order.id, OrderStatus::Completed).await);
    assert!(station.backend.active_orders().is_empty());
    assert_eq!(station.backend.archived_orders().len(), 1);
    assert!(!station.store.archive_failed(&order.id));

    let history = station.store.fetch_history().await.unwrap();
    assert_eq!(history[0].id, order.id);
    assert_eq!(history[0].status, OrderStatus::Completed);
}

#[tokio::test]
async fn test_archive_failure_recorded_without_rollback() {
    let station = station().await;
    let mut events = station.store.events();
    fill_cart(&station);
    let order = station
        .store
        .create_order(Customer::new("Ana", "555"))
        .await
        .unwrap();

    station.backend.set_fail_archive(true);
    assert!(station.store.update_order_status(&order.id, OrderStatus::Completed).await);

    assert!(station.store.archive_failed(&order.id));
    assert_eq!(station.store.order(&order.id).unwrap().status, OrderStatus::Completed);
    assert_eq!(count(&station, NotificationType::Error), 1);

    let mut archive_failed = false;
    while let Ok(event) = events.try_recv() {
        if let OrderStoreEvent::ArchiveFailed { order_id, .. } = event {
            assert_eq!(order_id, order.id);
            archive_failed = true;
        }
    }
    assert!(archive_failed);

    // Still active upstream: the flag stays
    station.store.apply_snapshot(&snapshot(1, &station.backend.active_orders()));
    assert!(station.store.archive_failed(&order.id));

    // Once it leaves the active set the flag is dropped
    station.store.apply_snapshot(&snapshot(2, &[]));
    assert!(!station.store.archive_failed(&order.id));
}

#[tokio::test]
async fn test_invalid_transitions_are_noops() {
    let station = station().await;
    fill_cart(&station);
    let order = station
        .store
        .create_order(Customer::new("Ana", "555"))
        .await
        .unwrap();
    station.clock.advance(Duration::from_secs(10));

    assert!(!station.store.update_order_status("missing", OrderStatus::Ready).await);
    assert!(!station.store.update_order_status(&order.id, OrderStatus::Pending).await);

    assert!(station.store.update_order_status(&order.id, OrderStatus::Cancelled).await);
    station.clock.advance(Duration::from_secs(10));
    assert!(!station.store.update_order_status(&order.id, OrderStatus::Preparing).await);

    assert_eq!(station.store.order(&order.id).unwrap().status, OrderStatus::Cancelled);
    assert_eq!(count(&station, NotificationType::OrderUpdate), 1);
    assert_eq!(station.backend.calls().update.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_remote_changes_notify_after_first_snapshot() {
    let station = station().await;
    let first = api_order(
        "ord-1",
        "Ana",
        BackendOrderStatus::Pending,
        None,
        vec![api_item("p1", "Burger", 10.0, 1)],
    );

    // Initial load is silent
    station.store.apply_snapshot(&snapshot(1, &[first.clone()]));
    assert!(station.notifications.notifications().is_empty());

    let mut preparing = first.clone();
    preparing.status = BackendOrderStatus::InProgress;
    let second = api_order(
        "ord-2",
        "Luis",
        BackendOrderStatus::Pending,
        None,
        vec![api_item("p2", "Fries", 5.0, 1)],
    );
    station.store.apply_snapshot(&snapshot(2, &[preparing, second]));

    assert_eq!(count(&station, NotificationType::NewOrder), 1);
    assert_eq!(count(&station, NotificationType::OrderUpdate), 1);
    assert_eq!(station.store.current_orders().len(), 2);
}

#[tokio::test]
async fn test_stale_and_error_snapshots_are_ignored() {
    let station = station().await;
    let order = api_order("ord-1", "Ana", BackendOrderStatus::Pending, None, vec![]);

    station.store.apply_snapshot(&snapshot(5, &[order]));
    station.store.apply_snapshot(&snapshot(4, &[]));
    assert_eq!(station.store.current_orders().len(), 1);

    let mut error = snapshot(6, &[]);
    error.error = Some("permission denied".into());
    station.store.apply_snapshot(&error);
    assert_eq!(station.store.current_orders().len(), 1);
}

#[tokio::test]
async fn test_categories_rederived_from_menu() {
    let station = station().await;
    let record = api_order(
        "ord-1",
        "Ana",
        BackendOrderStatus::Pending,
        None,
        vec![
            api_item("p1", "Burger", 10.0, 1),
            api_item("p2", "Fries", 5.0, 1),
            api_item("p9", "Gone", 1.0, 1),
        ],
    );

    station.store.apply_snapshot(&snapshot(1, &[record.clone()]));
    let categories: Vec<String> = station.store.current_orders()[0]
        .items
        .iter()
        .map(|item| item.category.clone())
        .collect();
    assert_eq!(categories, vec!["mains", UNCATEGORIZED, UNCATEGORIZED]);

    // A local category assignment survives a catalog without categories
    let patch = MenuItemPatch {
        category: Some("sides".into()),
        ..Default::default()
    };
    assert!(station.store.update_menu_item("p2", patch).await);
    station.backend.put_product(product("p2", "Fries", 5.0, None));
    assert!(station.store.refresh_menu().await);
    assert_eq!(station.store.menu_item("p2").unwrap().category, "sides");

    station.store.apply_snapshot(&snapshot(2, &[record]));
    assert_eq!(station.store.current_orders()[0].items[1].category, "sides");
}

#[tokio::test]
async fn test_corrupt_persisted_state_starts_empty() {
    let cache = PersistedCache::new(Arc::new(MemoryStore::new()));
    cache.store().set(keys::CART, "{not json").unwrap();
    cache.store().set(keys::ORDERS, "[{\"id\": 1}]").unwrap();
    cache.store().set(keys::MENU_ITEMS, "null").unwrap();

    let station = station_with_cache(cache);
    assert!(station.store.current_cart().is_empty());
    assert!(station.store.current_orders().is_empty());
    assert!(station.store.current_menu_items().is_empty());
}

#[tokio::test]
async fn test_offline_order_survives_restart() {
    let cache = PersistedCache::in_memory();
    let station = station_with_cache(cache.clone());
    station.store.refresh_menu().await;
    station.backend.set_fail_create(true);
    fill_cart(&station);
    let placeholder = station
        .store
        .create_order(Customer::new("Ana", "555"))
        .await
        .unwrap();

    let restarted = station_with_cache(cache);
    assert_eq!(restarted.store.current_orders(), vec![placeholder.clone()]);

    // Still pending after the restart
    restarted.store.apply_snapshot(&snapshot(1, &[]));
    assert_eq!(restarted.store.current_orders().len(), 1);
}

#[tokio::test]
async fn test_reused_id_replaces_local_order() {
    let station = station().await;
    let original = api_order("ord-1", "Ana", BackendOrderStatus::Pending, None, vec![]);
    station.store.apply_snapshot(&snapshot(1, &[original]));

    // Orders are keyed by id only: a different order under the same id
    // silently takes the old one's place
    let reused = api_order("ord-1", "Luis", BackendOrderStatus::Pending, None, vec![]);
    station.store.apply_snapshot(&snapshot(2, &[reused]));

    let orders = station.store.current_orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].customer.name, "Luis");
    assert!(station.notifications.notifications().is_empty());
}

#[tokio::test]
async fn test_closed_store_ignores_work() {
    let station = station().await;
    fill_cart(&station);
    station.store.close();

    assert!(station.store.create_order(Customer::new("Ana", "555")).await.is_none());
    station
        .store
        .apply_snapshot(&snapshot(1, &[api_order("ord-1", "Ana", BackendOrderStatus::Pending, None, vec![])]));
    assert!(station.store.current_orders().is_empty());
}

#[tokio::test]
async fn test_engine_end_to_end() {
    let config = ClientConfig::default().with_products_topic("productos");
    let (engine, backend) = Engine::simulated(config, PersistedCache::in_memory()).unwrap();
    backend.put_product(product("p1", "Burger", 10.0, Some("mains")));
    engine.start().await;

    let store = engine.store();
    for _ in 0..500 {
        if store.menu_item("p1").is_some() && engine.is_connected() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let burger = store.menu_item("p1").unwrap();
    store.add_to_cart(LineItem::from_menu_item(&burger, 2));

    let order = store.create_order(Customer::new("Ana", "555")).await.unwrap();
    assert!(store.update_order_status(&order.id, OrderStatus::Preparing).await);

    for _ in 0..500 {
        if backend.active_orders()[0].status == BackendOrderStatus::InProgress
            && store.order(&order.id).is_some_and(|o| o.status == OrderStatus::Preparing)
        {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(store.current_orders().len(), 1);
    assert_eq!(store.current_orders()[0].items[0].category, "mains");

    let invoice = engine.invoice_order(&order.id).unwrap();
    assert_eq!(invoice.total, 20.0);
    assert_eq!(engine.billing().invoices().len(), 1);

    engine.shutdown().await;
    assert!(!engine.is_connected());
    assert!(store.create_order(Customer::new("Ana", "555")).await.is_none());
}
