//! Simulated station
//!
//! Runs one engine against the in-process backend: loads a small menu,
//! places an order, walks it through the kitchen and prints the invoice and
//! the closing report.
//!
//! Run: cargo run -p comanda-client --example simulated_station

use comanda_client::billing::completed_orders_for;
use comanda_client::logger::init_logger;
use comanda_client::storage::PersistedCache;
use comanda_client::{
    ClientConfig, Customer, Engine, InvoiceRenderer, LineItem, OrderStatus,
    PlainTextInvoiceRenderer,
};
use shared::models::StoreInfo;
use shared::remote::{ApiProduct, Price};
use shared::util::{day_of, now_millis};
use std::time::Duration;

fn product(id: &str, name: &str, price: f64, category: &str) -> ApiProduct {
    ApiProduct {
        id: id.into(),
        name: name.into(),
        description: String::new(),
        ingredients: vec![],
        price: Price::new("MXN", price),
        images: vec![],
        is_available: Some(true),
        category: Some(category.into()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger(Some("info"));

    let config = ClientConfig::from_env()
        .with_products_topic("productos")
        .with_issuer(StoreInfo::new(
            "Comanda Grill",
            "Av. Juarez 10, CDMX",
            "555-0000",
            "hola@comanda.mx",
        ));
    let (engine, backend) = Engine::simulated(config, PersistedCache::in_memory())?;

    backend.put_product(product("burger", "Hamburguesa", 10.0, "platos"));
    backend.put_product(product("fries", "Papas", 5.0, "extras"));
    backend.put_product(product("soda", "Refresco", 2.5, "bebidas"));

    engine.start().await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let store = engine.store();
    for (id, quantity) in [("burger", 2), ("fries", 1)] {
        let item = store
            .menu_item(id)
            .ok_or_else(|| anyhow::anyhow!("menu item {} not loaded", id))?;
        store.add_to_cart(LineItem::from_menu_item(&item, quantity));
    }
    println!("Cart: {} items, total ${:.2}", store.cart_item_count(), store.cart_total());

    let order = store
        .create_order(Customer::new("Ana", "555-0101").with_table("4"))
        .await
        .ok_or_else(|| anyhow::anyhow!("checkout produced no order"))?;
    println!("Placed order {}", order.id);

    for status in [OrderStatus::Preparing, OrderStatus::Ready] {
        store.update_order_status(&order.id, status).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        if let Some(current) = store.order(&order.id) {
            println!("Order {} is {}", current.id, current.status);
        }
    }

    let invoice = engine
        .invoice_order(&order.id)
        .ok_or_else(|| anyhow::anyhow!("order {} left the active set", order.id))?;
    let renderer = PlainTextInvoiceRenderer::default();
    println!("\n{}", renderer.render(&invoice));

    let orders = store.current_orders();
    let summary = engine.daily_summary(day_of(now_millis()));
    let completed = completed_orders_for(&summary, &orders);
    println!("{}", renderer.render_daily_summary(&summary, &completed));

    println!("Notifications:");
    for notification in engine.notifications().notifications() {
        println!("  [{}] {}: {}", notification.kind, notification.title, notification.message);
    }

    engine.shutdown().await;
    Ok(())
}
