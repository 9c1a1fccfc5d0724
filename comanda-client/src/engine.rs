//! Station session
//!
//! [`Engine`] owns one instance of every component and the tasks that feed
//! push channel deliveries into the order store.
//!
//! ```text
//! PushChannel ──orders topic──▶ OrderStore::apply_snapshot ──▶ NotificationCenter
//!             ──products topic─▶ OrderStore::apply_products_snapshot
//! ```

use chrono::NaiveDate;
use parking_lot::Mutex;
use shared::models::{DailySummary, Invoice};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::billing::BillingService;
use crate::channel::{MemoryHub, PushChannel, SnapshotTransport, TcpTransport, TopicSubscription};
use crate::notification::{AlertSink, Clock, LogAlertSink, NotificationCenter, SystemClock};
use crate::remote::{HttpOrderService, HttpProductService, OrderService, ProductService, SimulatedBackend};
use crate::storage::PersistedCache;
use crate::store::OrderStore;
use crate::{ClientConfig, ClientError, ClientResult};

/// Builder for [`Engine`]
///
/// Anything not supplied falls back to the configuration: REST services at
/// `base_url`, a TCP transport at `snapshot_addr`, an in-memory cache, the
/// system clock and a logging alert sink.
pub struct EngineBuilder {
    config: ClientConfig,
    cache: Option<PersistedCache>,
    clock: Option<Arc<dyn Clock>>,
    alert_sink: Option<Arc<dyn AlertSink>>,
    transport: Option<Arc<dyn SnapshotTransport>>,
    orders_api: Option<Arc<dyn OrderService>>,
    products_api: Option<Arc<dyn ProductService>>,
}

impl EngineBuilder {
    pub fn cache(mut self, cache: PersistedCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn alert_sink(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.alert_sink = Some(sink);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn SnapshotTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn services(
        mut self,
        orders: Arc<dyn OrderService>,
        products: Arc<dyn ProductService>,
    ) -> Self {
        self.orders_api = Some(orders);
        self.products_api = Some(products);
        self
    }

    pub fn build(self) -> ClientResult<Engine> {
        let (orders_api, products_api) = match (self.orders_api, self.products_api) {
            (Some(orders), Some(products)) => (orders, products),
            (orders, products) => {
                let http = self.config.build_http_client()?;
                let orders = orders
                    .unwrap_or_else(|| Arc::new(HttpOrderService::new(http.clone())));
                let products =
                    products.unwrap_or_else(|| Arc::new(HttpProductService::new(http)));
                (orders, products)
            }
        };

        let transport: Arc<dyn SnapshotTransport> = match (self.transport, &self.config.snapshot_addr) {
            (Some(transport), _) => transport,
            (None, Some(addr)) => Arc::new(TcpTransport::new(addr.clone())),
            (None, None) => {
                return Err(ClientError::Validation(
                    "no snapshot transport or snapshot address configured".into(),
                ));
            }
        };

        let cache = self.cache.unwrap_or_else(PersistedCache::in_memory);
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let sink = self.alert_sink.unwrap_or_else(|| Arc::new(LogAlertSink));

        let notifications = Arc::new(NotificationCenter::new(cache.clone(), clock.clone(), sink));
        let store = OrderStore::new(
            cache.clone(),
            orders_api,
            products_api,
            notifications.clone(),
            clock.clone(),
            self.config.currency.clone(),
        );
        let billing = Arc::new(BillingService::new(
            cache.clone(),
            clock,
            self.config.tax_rate,
            self.config.issuer.clone(),
        ));
        let channel = PushChannel::new(transport, self.config.reconnect);

        Ok(Engine {
            config: self.config,
            cache,
            notifications,
            store,
            channel,
            billing,
            running: Mutex::new(None),
        })
    }
}

struct Running {
    shutdown: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

/// One station session
pub struct Engine {
    config: ClientConfig,
    cache: PersistedCache,
    notifications: Arc<NotificationCenter>,
    store: OrderStore,
    channel: PushChannel,
    billing: Arc<BillingService>,
    running: Mutex<Option<Running>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("orders_topic", &self.config.orders_topic)
            .field("running", &self.is_running())
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn builder(config: ClientConfig) -> EngineBuilder {
        EngineBuilder {
            config,
            cache: None,
            clock: None,
            alert_sink: None,
            transport: None,
            orders_api: None,
            products_api: None,
        }
    }

    /// Engine backed by an in-process [`SimulatedBackend`]
    pub fn simulated(
        config: ClientConfig,
        cache: PersistedCache,
    ) -> ClientResult<(Self, Arc<SimulatedBackend>)> {
        let hub = MemoryHub::new();
        let mut backend = SimulatedBackend::new(hub.clone(), config.orders_topic.clone());
        if let Some(topic) = &config.products_topic {
            backend = backend.with_products_topic(topic.clone());
        }
        let backend = Arc::new(backend);

        let engine = Self::builder(config)
            .cache(cache)
            .transport(Arc::new(hub.transport()))
            .services(backend.clone(), backend.clone())
            .build()?;
        Ok((engine, backend))
    }

    /// Subscribe to the configured topics and load the menu
    ///
    /// Calling it on a running engine does nothing. Must be called inside a
    /// tokio runtime.
    pub async fn start(&self) {
        {
            let mut running = self.running.lock();
            if running.is_some() {
                tracing::debug!("Engine already started");
                return;
            }

            let shutdown = CancellationToken::new();
            let mut tasks = Vec::new();

            let orders = self.channel.subscribe(&self.config.orders_topic);
            let store = self.store.clone();
            tasks.push(tokio::spawn(forward(
                orders,
                shutdown.clone(),
                move |update| store.apply_snapshot(&update),
            )));

            if let Some(topic) = &self.config.products_topic {
                let products = self.channel.subscribe(topic);
                let store = self.store.clone();
                tasks.push(tokio::spawn(forward(
                    products,
                    shutdown.clone(),
                    move |update| store.apply_products_snapshot(&update),
                )));
            }

            *running = Some(Running { shutdown, tasks });
        }

        tracing::info!(
            orders_topic = %self.config.orders_topic,
            products_topic = self.config.products_topic.as_deref().unwrap_or("-"),
            "Engine started"
        );
        self.store.refresh_menu().await;
    }

    /// Tear down every subscription and close the store
    ///
    /// Operations still in flight complete without touching state.
    pub async fn shutdown(&self) {
        self.store.close();
        self.channel.unsubscribe_all();

        let Some(running) = self.running.lock().take() else {
            return;
        };
        running.shutdown.cancel();
        for task in running.tasks {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Snapshot forwarder ended abnormally");
            }
        }
        tracing::info!("Engine stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }

    /// Push channel connectivity
    pub fn is_connected(&self) -> bool {
        self.channel.is_connected()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn cache(&self) -> &PersistedCache {
        &self.cache
    }

    pub fn store(&self) -> &OrderStore {
        &self.store
    }

    pub fn notifications(&self) -> &Arc<NotificationCenter> {
        &self.notifications
    }

    pub fn channel(&self) -> &PushChannel {
        &self.channel
    }

    pub fn billing(&self) -> &Arc<BillingService> {
        &self.billing
    }

    /// Summary of the open orders created on `date`
    pub fn daily_summary(&self, date: NaiveDate) -> DailySummary {
        self.billing
            .generate_daily_summary(&self.store.current_orders(), date)
    }

    /// Invoice an open order by id
    pub fn invoice_order(&self, order_id: &str) -> Option<Invoice> {
        let order = self.store.order(order_id)?;
        Some(self.billing.generate_invoice(&order))
    }
}

async fn forward<F>(mut subscription: TopicSubscription, shutdown: CancellationToken, apply: F)
where
    F: Fn(crate::channel::SnapshotUpdate) + Send + 'static,
{
    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            update = subscription.next() => {
                let Some(update) = update else {
                    tracing::debug!(topic = subscription.topic(), "Topic closed");
                    break;
                };
                apply(update);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_transport_fails() {
        let result = Engine::builder(ClientConfig::default()).build();
        assert!(matches!(result, Err(ClientError::Validation(_))));
    }

    #[test]
    fn test_build_with_snapshot_addr() {
        let config = ClientConfig::default().with_snapshot_addr("127.0.0.1:9000");
        let engine = Engine::builder(config).build().unwrap();
        assert!(!engine.is_running());
        assert!(!engine.is_connected());
    }

    #[tokio::test]
    async fn test_start_and_shutdown() {
        let (engine, _backend) =
            Engine::simulated(ClientConfig::default(), PersistedCache::in_memory()).unwrap();

        engine.start().await;
        assert!(engine.is_running());
        assert_eq!(engine.channel().active_topics(), vec!["pedidos_activos"]);

        engine.shutdown().await;
        assert!(!engine.is_running());
        assert!(engine.store().is_closed());
        assert!(engine.channel().active_topics().is_empty());
    }
}
