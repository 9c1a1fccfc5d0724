//! Comanda Client - order synchronization engine for restaurant stations
//!
//! Keeps a station's cart, open orders and menu in sync with the order
//! backend: durable writes go through the REST services, live state arrives
//! as snapshots on the push channel, and every change surfaces as a
//! notification.

pub mod billing;
pub mod channel;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod logger;
pub mod notification;
pub mod remote;
pub mod storage;
pub mod store;

pub use config::{ClientConfig, ReconnectPolicy};
pub use engine::{Engine, EngineBuilder};
pub use error::{ChannelError, ClientError, ClientResult, StorageError};
pub use http::HttpClient;

pub use billing::{BillingService, InvoiceRenderer, PlainTextInvoiceRenderer};
pub use channel::{ConnectionState, PushChannel, SnapshotUpdate, TopicSubscription};
pub use notification::{AlertPermission, AlertSink, Clock, NotificationCenter};
pub use storage::PersistedCache;
pub use store::{OrderStore, OrderStoreEvent};

// Re-export shared types for convenience
pub use shared::models::{DailySummary, Invoice, MenuItem, Notification, NotificationType};
pub use shared::order::{Customer, LineItem, Order, OrderStatus};
