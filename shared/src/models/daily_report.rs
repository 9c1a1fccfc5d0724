//! Daily Summary Model

use crate::order::OrderStatus;
use crate::types::Amount;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of items listed in [`DailySummary::top_items`]
pub const TOP_ITEMS: usize = 5;

/// Per-status order counts
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: u32,
    pub preparing: u32,
    pub ready: u32,
    pub completed: u32,
    pub cancelled: u32,
}

impl StatusCounts {
    pub fn increment(&mut self, status: OrderStatus) {
        match status {
            OrderStatus::Pending => self.pending += 1,
            OrderStatus::Preparing => self.preparing += 1,
            OrderStatus::Ready => self.ready += 1,
            OrderStatus::Completed => self.completed += 1,
            OrderStatus::Cancelled => self.cancelled += 1,
        }
    }

    pub fn get(&self, status: OrderStatus) -> u32 {
        match status {
            OrderStatus::Pending => self.pending,
            OrderStatus::Preparing => self.preparing,
            OrderStatus::Ready => self.ready,
            OrderStatus::Completed => self.completed,
            OrderStatus::Cancelled => self.cancelled,
        }
    }
}

/// Item sales aggregated by name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopItem {
    pub name: String,
    pub quantity: u32,
    pub revenue: Amount,
}

/// Daily summary derived from the order set (never persisted)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    /// Business date (YYYY-MM-DD format)
    pub date: String,
    pub total_orders: u32,
    pub total_revenue: Amount,
    pub orders_by_status: StatusCounts,
    /// Category → item quantity
    pub orders_by_category: BTreeMap<String, u32>,
    /// At most [`TOP_ITEMS`] entries, revenue descending
    pub top_items: Vec<TopItem>,
}

impl DailySummary {
    pub fn average_ticket(&self) -> Amount {
        if self.total_orders == 0 {
            0.0
        } else {
            self.total_revenue / f64::from(self.total_orders)
        }
    }
}
