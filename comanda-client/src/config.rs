//! Client configuration

use shared::models::StoreInfo;
use std::time::Duration;

/// Default backend collection for active orders
pub const DEFAULT_ORDERS_TOPIC: &str = "pedidos_activos";
/// Default VAT rate applied to invoices
pub const DEFAULT_TAX_RATE: f64 = 0.16;
/// Default currency for product prices
pub const DEFAULT_CURRENCY: &str = "MXN";

/// Push channel reconnect policy
///
/// Fixed backoff between attempts; after `max_attempts` consecutive
/// failures the topic stays disconnected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff: Duration::from_secs(3),
        }
    }
}

impl ReconnectPolicy {
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }
}

/// Client configuration for the order engine
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g., "http://localhost:8080/api")
    pub base_url: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Snapshot server address (`host:port`) for the TCP push transport
    pub snapshot_addr: Option<String>,

    /// Push channel topic carrying the active orders
    pub orders_topic: String,

    /// Push channel topic carrying the product list, if the backend has one
    pub products_topic: Option<String>,

    /// Tax rate included in order totals
    pub tax_rate: f64,

    /// Currency used when sending prices to the backend
    pub currency: String,

    /// Issuer printed on invoices
    pub issuer: StoreInfo,

    /// Push channel reconnect policy
    pub reconnect: ReconnectPolicy,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            snapshot_addr: None,
            orders_topic: DEFAULT_ORDERS_TOPIC.to_string(),
            products_topic: None,
            tax_rate: DEFAULT_TAX_RATE,
            currency: DEFAULT_CURRENCY.to_string(),
            issuer: StoreInfo::default(),
            reconnect: ReconnectPolicy::default(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// | variable | default |
    /// |---|---|
    /// | `COMANDA_API_URL` | `http://localhost:8080/api` |
    /// | `COMANDA_API_TOKEN` | none |
    /// | `COMANDA_TIMEOUT_SECS` | 30 |
    /// | `COMANDA_SNAPSHOT_ADDR` | none |
    /// | `COMANDA_ORDERS_TOPIC` | `pedidos_activos` |
    /// | `COMANDA_TAX_RATE` | 0.16 |
    /// | `COMANDA_CURRENCY` | `MXN` |
    pub fn from_env() -> Self {
        let base_url = std::env::var("COMANDA_API_URL")
            .unwrap_or_else(|_| "http://localhost:8080/api".to_string());

        let mut config = Self::new(base_url);
        config.token = std::env::var("COMANDA_API_TOKEN")
            .ok()
            .filter(|token| !token.is_empty());
        config.timeout = std::env::var("COMANDA_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(config.timeout);
        config.snapshot_addr = std::env::var("COMANDA_SNAPSHOT_ADDR")
            .ok()
            .filter(|addr| !addr.is_empty());
        config.orders_topic =
            std::env::var("COMANDA_ORDERS_TOPIC").unwrap_or(config.orders_topic);
        config.tax_rate = std::env::var("COMANDA_TAX_RATE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|rate: &f64| *rate >= 0.0)
            .unwrap_or(config.tax_rate);
        config.currency = std::env::var("COMANDA_CURRENCY").unwrap_or(config.currency);
        config
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the snapshot server address
    pub fn with_snapshot_addr(mut self, addr: impl Into<String>) -> Self {
        self.snapshot_addr = Some(addr.into());
        self
    }

    /// Set the active orders topic
    pub fn with_orders_topic(mut self, topic: impl Into<String>) -> Self {
        self.orders_topic = topic.into();
        self
    }

    /// Subscribe to a products topic as well
    pub fn with_products_topic(mut self, topic: impl Into<String>) -> Self {
        self.products_topic = Some(topic.into());
        self
    }

    pub fn with_tax_rate(mut self, rate: f64) -> Self {
        self.tax_rate = rate;
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_issuer(mut self, issuer: StoreInfo) -> Self {
        self.issuer = issuer;
        self
    }

    pub fn with_reconnect(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect = policy;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> crate::ClientResult<super::HttpClient> {
        super::HttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080/api")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.orders_topic, DEFAULT_ORDERS_TOPIC);
        assert_eq!(config.tax_rate, 0.16);
        assert_eq!(config.currency, "MXN");
        assert_eq!(config.reconnect.max_attempts, 5);
        assert_eq!(config.reconnect.backoff, Duration::from_secs(3));
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::new("http://backend")
            .with_token("t")
            .with_tax_rate(0.08)
            .with_products_topic("productos")
            .with_reconnect(ReconnectPolicy::default().with_max_attempts(2));

        assert_eq!(config.token.as_deref(), Some("t"));
        assert_eq!(config.tax_rate, 0.08);
        assert_eq!(config.products_topic.as_deref(), Some("productos"));
        assert_eq!(config.reconnect.max_attempts, 2);
    }
}
