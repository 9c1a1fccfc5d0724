//! Billing aggregator
//!
//! Folds orders into daily summaries and single-order invoices. Summaries
//! are derived on demand and never stored; invoices are kept in a persisted
//! history, newest first. Neither touches the input orders.

mod render;

pub use render::{InvoiceRenderer, PlainTextInvoiceRenderer};

use chrono::NaiveDate;
use parking_lot::Mutex;
use shared::models::{DailySummary, Invoice, StatusCounts, StoreInfo, TOP_ITEMS, TopItem, split_tax};
use shared::order::{Order, OrderStatus};
use shared::util::{date_key, day_of};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;

use crate::notification::Clock;
use crate::storage::{PersistedCache, keys};

/// Summarize the orders created on `date` (UTC calendar day)
pub fn generate_daily_summary(orders: &[Order], date: NaiveDate) -> DailySummary {
    let day_orders: Vec<&Order> = orders
        .iter()
        .filter(|order| day_of(order.timestamp) == date)
        .collect();

    let mut orders_by_status = StatusCounts::default();
    let mut orders_by_category: BTreeMap<String, u32> = BTreeMap::new();
    // Keyed by name so ties keep a stable order
    let mut item_stats: BTreeMap<&str, (u32, f64)> = BTreeMap::new();

    for order in &day_orders {
        orders_by_status.increment(order.status);
        for item in &order.items {
            *orders_by_category.entry(item.category.clone()).or_default() += item.quantity;

            let stats = item_stats.entry(item.name.as_str()).or_default();
            stats.0 += item.quantity;
            stats.1 += item.line_total();
        }
    }

    let mut top_items: Vec<TopItem> = item_stats
        .into_iter()
        .map(|(name, (quantity, revenue))| TopItem {
            name: name.to_string(),
            quantity,
            revenue,
        })
        .collect();
    top_items.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    top_items.truncate(TOP_ITEMS);

    DailySummary {
        date: date_key(date),
        total_orders: day_orders.len() as u32,
        total_revenue: day_orders.iter().map(|order| order.total).sum(),
        orders_by_status,
        orders_by_category,
        top_items,
    }
}

/// Completed orders of the summary's day, for the closing report detail
pub fn completed_orders_for(summary: &DailySummary, orders: &[Order]) -> Vec<Order> {
    orders
        .iter()
        .filter(|order| {
            order.status == OrderStatus::Completed && date_key(day_of(order.timestamp)) == summary.date
        })
        .cloned()
        .collect()
}

/// Invoice generation and history
pub struct BillingService {
    cache: PersistedCache,
    clock: Arc<dyn Clock>,
    tax_rate: f64,
    issuer: StoreInfo,
    invoices: Mutex<Vec<Invoice>>,
    invoices_tx: watch::Sender<Vec<Invoice>>,
}

impl std::fmt::Debug for BillingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BillingService")
            .field("tax_rate", &self.tax_rate)
            .field("issuer", &self.issuer.name)
            .field("invoices", &self.invoices.lock().len())
            .finish()
    }
}

impl BillingService {
    pub fn new(cache: PersistedCache, clock: Arc<dyn Clock>, tax_rate: f64, issuer: StoreInfo) -> Self {
        let invoices: Vec<Invoice> = cache.load_or_default(keys::INVOICES);
        let (invoices_tx, _) = watch::channel(invoices.clone());
        Self {
            cache,
            clock,
            tax_rate,
            issuer,
            invoices: Mutex::new(invoices),
            invoices_tx,
        }
    }

    pub fn tax_rate(&self) -> f64 {
        self.tax_rate
    }

    pub fn generate_daily_summary(&self, orders: &[Order], date: NaiveDate) -> DailySummary {
        generate_daily_summary(orders, date)
    }

    /// Summary for the current UTC day
    pub fn today_summary(&self, orders: &[Order]) -> DailySummary {
        generate_daily_summary(orders, day_of(self.clock.now_millis()))
    }

    /// Build an invoice for an order and prepend it to the history
    pub fn generate_invoice(&self, order: &Order) -> Invoice {
        let now = self.clock.now_millis();
        let (subtotal, tax) = split_tax(order.total, self.tax_rate);

        let mut invoices = self.invoices.lock();

        let base = format!("INV-{}", now);
        let mut id = base.clone();
        let mut suffix = 1;
        while invoices.iter().any(|invoice| invoice.id == id) {
            id = format!("{}-{}", base, suffix);
            suffix += 1;
        }

        let invoice = Invoice {
            id,
            order_id: order.id.clone(),
            customer: order.customer.clone(),
            items: order.items.clone(),
            subtotal,
            tax,
            total: order.total,
            tax_rate: self.tax_rate,
            created_at: now,
            issuer: self.issuer.clone(),
        };

        invoices.insert(0, invoice.clone());
        self.cache.persist(keys::INVOICES, &*invoices);
        self.invoices_tx.send_replace(invoices.clone());

        tracing::info!(invoice_id = %invoice.id, order_id = %order.id, total = order.total, "Invoice generated");
        invoice
    }

    /// Invoice history, newest first
    pub fn invoices(&self) -> Vec<Invoice> {
        self.invoices.lock().clone()
    }

    pub fn subscribe_invoices(&self) -> watch::Receiver<Vec<Invoice>> {
        self.invoices_tx.subscribe()
    }
}
