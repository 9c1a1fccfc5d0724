//! Shopping cart

use serde::{Deserialize, Serialize};
use shared::order::{LineItem, cart_item_count, cart_total};
use shared::types::Amount;

/// Ordered cart lines
///
/// Adding a line that matches an existing one (same product, same
/// customization) adds to its quantity instead of appending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<LineItem>,
}

impl Cart {
    pub fn new(lines: Vec<LineItem>) -> Self {
        let mut cart = Self::default();
        for line in lines {
            cart.add(line);
        }
        cart
    }

    pub fn add(&mut self, line: LineItem) {
        match self.lines.iter_mut().find(|existing| existing.same_line(&line)) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(line.quantity.max(1))
            }
            None => self.lines.push(line),
        }
    }

    /// Remove every line of a product
    pub fn remove(&mut self, item_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.id != item_id);
        self.lines.len() != before
    }

    /// Set the quantity of every line of a product; zero or less removes them
    pub fn update_quantity(&mut self, item_id: &str, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(item_id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let mut changed = false;
        for line in self.lines.iter_mut().filter(|line| line.id == item_id) {
            line.quantity = quantity;
            changed = true;
        }
        changed
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Empty the cart, returning its lines
    pub fn take(&mut self) -> Vec<LineItem> {
        std::mem::take(&mut self.lines)
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total(&self) -> Amount {
        cart_total(&self.lines)
    }

    pub fn item_count(&self) -> u32 {
        cart_item_count(&self.lines)
    }
}
