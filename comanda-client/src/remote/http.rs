use super::{OrderService, ProductService};
use crate::{ClientResult, HttpClient};
use async_trait::async_trait;
use shared::order::BackendOrderStatus;
use shared::remote::{ApiOrder, ApiProduct, CreateOrderRequest, ProductDraft, ProductPatch};

/// REST order service
#[derive(Debug, Clone)]
pub struct HttpOrderService {
    http: HttpClient,
}

impl HttpOrderService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl OrderService for HttpOrderService {
    async fn create_order(&self, request: &CreateOrderRequest) -> ClientResult<ApiOrder> {
        self.http.post("order", request).await
    }

    async fn update_status(
        &self,
        order_id: &str,
        status: BackendOrderStatus,
    ) -> ClientResult<ApiOrder> {
        let path = format!("order/{}/status/{}", order_id, status.as_str());
        self.http
            .put(&path, &serde_json::Value::Object(Default::default()))
            .await
    }

    async fn archive_order(&self, order_id: &str) -> ClientResult<()> {
        self.http
            .post_empty(&format!("order/{}/archive", order_id))
            .await
    }

    async fn fetch_history(&self) -> ClientResult<Vec<ApiOrder>> {
        self.http.get("order/history").await
    }
}

/// REST product service
#[derive(Debug, Clone)]
pub struct HttpProductService {
    http: HttpClient,
}

impl HttpProductService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ProductService for HttpProductService {
    async fn fetch_products(&self) -> ClientResult<Vec<ApiProduct>> {
        self.http.get("product").await
    }

    async fn create_product(&self, draft: &ProductDraft) -> ClientResult<ApiProduct> {
        self.http.post("product", draft).await
    }

    async fn update_product(&self, id: &str, patch: &ProductPatch) -> ClientResult<ApiProduct> {
        self.http.put(&format!("product/{}", id), patch).await
    }

    async fn delete_product(&self, id: &str) -> ClientResult<()> {
        self.http.delete(&format!("product/{}", id)).await
    }
}
