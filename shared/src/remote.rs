//! Backend wire records
//!
//! Shapes of the order and product records exchanged with the REST backend
//! and carried by the push channel. Field names are camelCase on the wire.

use crate::order::BackendOrderStatus;
use crate::types::Amount;
use serde::{Deserialize, Serialize};

/// Money as the backend represents it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Price {
    pub currency: String,
    pub value: Amount,
}

impl Price {
    pub fn new(currency: impl Into<String>, value: Amount) -> Self {
        Self {
            currency: currency.into(),
            value,
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Order line as stored by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiOrderItem {
    pub product_id: String,
    #[serde(default)]
    pub name: String,
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    /// Not every backend sends it; reconciliation fills it from the menu
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Canonical order record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiOrder {
    pub id: String,
    #[serde(default)]
    pub waiter_id: String,
    #[serde(default)]
    pub table_number: u32,
    #[serde(default)]
    pub items: Vec<ApiOrderItem>,
    pub total_amount: Price,
    pub status: BackendOrderStatus,
    /// Opaque to the backend; the client stores customer details here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_preferences: Option<serde_json::Value>,
    /// RFC 3339
    #[serde(default)]
    pub created_at: String,
    /// RFC 3339
    #[serde(default)]
    pub updated_at: String,
}

/// Line of a create request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItem {
    pub product_id: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

/// Customer details as stored in `customerPreferences`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPreferences {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Client correlation id, echoed back through the push channel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_ref: Option<String>,
}

/// Create order request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub waiter_id: String,
    pub table_number: u32,
    pub items: Vec<CreateOrderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_preferences: Option<CustomerPreferences>,
}

// =============================================================================
// Products
// =============================================================================

/// Canonical product record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiProduct {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub price: Price,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Product create payload (a product without id)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub price: Price,
    pub images: Vec<String>,
    pub is_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Partial product update; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_order_wire_names() {
        let raw = r#"{
            "id": "ord-1",
            "waiterId": "w1",
            "tableNumber": 4,
            "items": [{"productId": "p1", "name": "Taco", "quantity": 2, "unitPrice": 3.5}],
            "totalAmount": {"currency": "MXN", "value": 7.0},
            "status": "en_progreso",
            "customerPreferences": {"name": "Ana", "phone": "555"},
            "createdAt": "2024-03-10T12:00:00Z",
            "updatedAt": "2024-03-10T12:05:00Z"
        }"#;
        let order: ApiOrder = serde_json::from_str(raw).unwrap();
        assert_eq!(order.table_number, 4);
        assert_eq!(order.items[0].unit_price, 3.5);
        assert_eq!(order.status, BackendOrderStatus::InProgress);
        assert!(order.items[0].category.is_none());
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let patch = ProductPatch {
            price: Some(Price::new("MXN", 12.0)),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"price": {"currency": "MXN", "value": 12.0}}));
    }
}
