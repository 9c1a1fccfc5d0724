//! Invoice Model

use super::StoreInfo;
use crate::order::{Customer, LineItem};
use crate::types::{Amount, Timestamp};
use serde::{Deserialize, Serialize};

/// Invoice for a single order
///
/// Amounts are back-computed from the tax-inclusive order total, so
/// `subtotal + tax == total` up to float rounding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// `INV-<unix millis>` with an optional `-<n>` suffix
    pub id: String,
    pub order_id: String,
    pub customer: Customer,
    pub items: Vec<LineItem>,
    pub subtotal: Amount,
    pub tax: Amount,
    pub total: Amount,
    /// Tax rate applied (e.g. 0.16)
    pub tax_rate: f64,
    /// Creation time (Unix millis)
    pub created_at: Timestamp,
    pub issuer: StoreInfo,
}

/// Split a tax-inclusive total into (subtotal, tax)
pub fn split_tax(total: Amount, rate: f64) -> (Amount, Amount) {
    let subtotal = total / (1.0 + rate);
    (subtotal, total - subtotal)
}
