//! Menu index
//!
//! Current menu plus the locally kept product → category overrides. The
//! backend does not always return a category, so the overrides fill the gap.

use shared::models::MenuItem;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuIndex {
    items: Vec<MenuItem>,
    overrides: BTreeMap<String, String>,
}

impl MenuIndex {
    pub fn new(items: Vec<MenuItem>, overrides: BTreeMap<String, String>) -> Self {
        let mut index = Self {
            items: Vec::new(),
            overrides,
        };
        index.replace(items);
        index
    }

    /// Replace the menu, filling missing categories from the overrides
    pub fn replace(&mut self, items: Vec<MenuItem>) {
        self.items = items
            .into_iter()
            .map(|item| self.with_override(item))
            .collect();
    }

    /// Insert or replace a single item
    pub fn upsert(&mut self, item: MenuItem) {
        let item = self.with_override(item);
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut MenuItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Non-empty category known for a product
    pub fn category_for(&self, id: &str) -> Option<&str> {
        self.get(id)
            .map(|item| item.category.as_str())
            .filter(|category| !category.is_empty())
            .or_else(|| {
                self.overrides
                    .get(id)
                    .map(String::as_str)
                    .filter(|category| !category.is_empty())
            })
    }

    pub fn set_override(&mut self, id: &str, category: &str) {
        self.overrides.insert(id.to_string(), category.to_string());
    }

    pub fn remove_override(&mut self, id: &str) {
        self.overrides.remove(id);
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn overrides(&self) -> &BTreeMap<String, String> {
        &self.overrides
    }

    fn with_override(&self, mut item: MenuItem) -> MenuItem {
        if item.category.is_empty() {
            if let Some(category) = self.overrides.get(&item.id) {
                item.category = category.clone();
            }
        }
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_fill_missing_categories() {
        let overrides = BTreeMap::from([
            ("p1".to_string(), "burgers".to_string()),
            ("p2".to_string(), "ignored".to_string()),
        ]);
        let index = MenuIndex::new(
            vec![
                MenuItem::new("p1", "Burger", 100.0),
                MenuItem::new("p2", "Soda", 20.0).with_category("drinks"),
            ],
            overrides,
        );

        assert_eq!(index.category_for("p1"), Some("burgers"));
        assert_eq!(index.category_for("p2"), Some("drinks"));
        assert_eq!(index.category_for("p3"), None);
    }

    #[test]
    fn test_upsert_and_remove() {
        let mut index = MenuIndex::default();
        index.set_override("p1", "sides");
        index.upsert(MenuItem::new("p1", "Fries", 40.0));
        index.upsert(MenuItem::new("p1", "Big fries", 55.0));

        assert_eq!(index.items().len(), 1);
        assert_eq!(index.items()[0].name, "Big fries");
        assert_eq!(index.items()[0].category, "sides");

        assert!(index.remove("p1"));
        assert!(!index.remove("p1"));
        // Known only through the override map now
        assert_eq!(index.category_for("p1"), Some("sides"));
    }
}
