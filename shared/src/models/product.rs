//! Menu Item Model

use crate::types::Amount;
use serde::{Deserialize, Serialize};

/// Menu item entity as the client holds it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Amount,
    /// Category name (empty when unknown)
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_available")]
    pub available: bool,
    /// True when the product has ingredients the customer can remove
    #[serde(default)]
    pub customizable: bool,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

fn default_available() -> bool {
    true
}

impl MenuItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Amount) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            category: String::new(),
            image: String::new(),
            available: true,
            customizable: false,
            ingredients: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = ingredients.into_iter().map(Into::into).collect();
        self.customizable = !self.ingredients.is_empty();
        self
    }
}

/// Update menu item payload
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MenuItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Amount>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub available: Option<bool>,
    pub ingredients: Option<Vec<String>>,
}

impl MenuItemPatch {
    /// Apply the present fields to a local item
    pub fn apply_to(&self, item: &mut MenuItem) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(category) = &self.category {
            item.category = category.clone();
        }
        if let Some(image) = &self.image {
            item.image = image.clone();
        }
        if let Some(available) = self.available {
            item.available = available;
        }
        if let Some(ingredients) = &self.ingredients {
            item.ingredients = ingredients.clone();
            item.customizable = !ingredients.is_empty();
        }
    }
}
