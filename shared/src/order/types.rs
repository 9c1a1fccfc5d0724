//! Order, cart line and customer types

use super::OrderStatus;
use crate::models::MenuItem;
use crate::types::{Amount, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Category literal used when neither the menu nor the backend knows one
pub const UNCATEGORIZED: &str = "uncategorized";

/// Customer details captured at checkout
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Customer {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            table: None,
            notes: None,
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Ingredient customization of a line
///
/// Sets, so two lines with the same choices in a different order still
/// merge.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customization {
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub selected: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub removed: BTreeSet<String>,
}

impl Customization {
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty() && self.removed.is_empty()
    }

    pub fn with_removed<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.removed.extend(ingredients.into_iter().map(Into::into));
        self
    }

    pub fn with_selected<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected.extend(ingredients.into_iter().map(Into::into));
        self
    }
}

/// A menu item snapshot plus quantity
///
/// Used both for cart lines and for the items of a placed order; the price
/// is frozen at the moment the line is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Product ID
    pub id: String,
    /// Product name
    pub name: String,
    /// Unit price snapshot
    pub price: Amount,
    /// Category name snapshot (for statistics)
    #[serde(default)]
    pub category: String,
    /// Quantity (≥ 1)
    pub quantity: u32,
    /// Ingredient list of the product
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Customization::is_empty")]
    pub customization: Customization,
}

impl LineItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Amount, quantity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            category: String::new(),
            quantity: quantity.max(1),
            ingredients: Vec::new(),
            customization: Customization::default(),
        }
    }

    /// Snapshot a menu item into a line
    pub fn from_menu_item(item: &MenuItem, quantity: u32) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            category: item.category.clone(),
            quantity: quantity.max(1),
            ingredients: item.ingredients.clone(),
            customization: Customization::default(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_customization(mut self, customization: Customization) -> Self {
        self.customization = customization;
        self
    }

    /// Unit price × quantity
    pub fn line_total(&self) -> Amount {
        self.price * f64::from(self.quantity)
    }

    /// Same product with the same customization
    pub fn same_line(&self, other: &LineItem) -> bool {
        self.id == other.id && self.customization == other.customization
    }
}

/// An order as the client sees it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Backend id, or a time-based local id while the backend has not
    /// assigned one
    pub id: String,
    pub customer: Customer,
    pub items: Vec<LineItem>,
    pub total: Amount,
    pub status: OrderStatus,
    /// Creation time (Unix millis)
    pub timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
    /// Client correlation id echoed back by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_ref: Option<String>,
}

impl Order {
    /// Build a pending order from cart lines, snapshotting the total
    pub fn from_cart(
        id: impl Into<String>,
        customer: Customer,
        items: Vec<LineItem>,
        timestamp: Timestamp,
    ) -> Self {
        let total = cart_total(&items);
        Self {
            id: id.into(),
            customer,
            items,
            total,
            status: OrderStatus::Pending,
            timestamp,
            estimated_minutes: None,
            client_ref: None,
        }
    }

    pub fn with_client_ref(mut self, client_ref: impl Into<String>) -> Self {
        self.client_ref = Some(client_ref.into());
        self
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

/// Sum of unit price × quantity
pub fn cart_total(items: &[LineItem]) -> Amount {
    items.iter().map(LineItem::line_total).sum()
}

/// Sum of quantities, saturating at `u32::MAX`
pub fn cart_item_count(items: &[LineItem]) -> u32 {
    items
        .iter()
        .fold(0u32, |count, item| count.saturating_add(item.quantity))
}
