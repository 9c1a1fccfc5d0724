//! Adapters between backend records and client records

use super::{Customer, LineItem, Order};
use crate::models::{MenuItem, MenuItemPatch};
use crate::remote::{
    ApiOrder, ApiProduct, CreateOrderItem, CreateOrderRequest, CustomerPreferences, Price,
    ProductDraft, ProductPatch,
};
use crate::util::parse_rfc3339_millis;

/// Convert a backend order into the client order model
///
/// Customer details come from `customerPreferences`; line categories are
/// whatever the backend sent (usually nothing) and get filled during
/// reconciliation.
pub fn api_order_to_order(order: &ApiOrder) -> Order {
    let prefs: CustomerPreferences = order
        .customer_preferences
        .as_ref()
        .and_then(|value| serde_json::from_value(value.clone()).ok())
        .unwrap_or_default();

    let customer = Customer {
        name: prefs.name,
        phone: prefs.phone,
        table: Some(order.table_number.to_string()),
        notes: prefs.notes,
    };

    let items = order
        .items
        .iter()
        .map(|item| LineItem {
            id: item.product_id.clone(),
            name: item.name.clone(),
            price: item.unit_price,
            category: item.category.clone().unwrap_or_default(),
            quantity: item.quantity.max(1),
            ingredients: item.ingredients.clone().unwrap_or_default(),
            customization: Default::default(),
        })
        .collect();

    let timestamp = match parse_rfc3339_millis(&order.created_at) {
        Some(ts) => ts,
        None => {
            tracing::warn!(
                order_id = %order.id,
                created_at = %order.created_at,
                "Unparseable order timestamp, using epoch"
            );
            0
        }
    };

    Order {
        id: order.id.clone(),
        customer,
        items,
        total: order.total_amount.value,
        status: order.status.to_client(),
        timestamp,
        estimated_minutes: None,
        client_ref: prefs.client_ref,
    }
}

/// Convert a backend product into a menu item
pub fn api_product_to_menu_item(product: &ApiProduct) -> MenuItem {
    MenuItem {
        id: product.id.clone(),
        name: product.name.clone(),
        description: product.description.clone(),
        price: product.price.value,
        category: product.category.clone().unwrap_or_default(),
        image: product.images.first().cloned().unwrap_or_default(),
        available: product.is_available.unwrap_or(true),
        customizable: !product.ingredients.is_empty(),
        ingredients: product.ingredients.clone(),
    }
}

/// Build the create payload for a menu item
pub fn menu_item_to_draft(item: &MenuItem, currency: &str) -> ProductDraft {
    ProductDraft {
        name: item.name.clone(),
        description: item.description.clone(),
        ingredients: item.ingredients.clone(),
        price: Price::new(currency, item.price),
        images: image_list(&item.image),
        is_available: item.available,
        category: non_empty(&item.category),
    }
}

/// Translate a partial menu item update into a product patch
pub fn menu_item_patch_to_product_patch(patch: &MenuItemPatch, currency: &str) -> ProductPatch {
    ProductPatch {
        name: patch.name.clone(),
        description: patch.description.clone(),
        ingredients: patch.ingredients.clone(),
        price: patch.price.map(|value| Price::new(currency, value)),
        images: patch.image.as_deref().map(image_list),
        is_available: patch.available,
        category: patch.category.as_deref().and_then(non_empty),
    }
}

/// Build the create-order request for the current cart
///
/// Removed ingredients travel as `specialInstructions`; a table that is not
/// a number becomes table 0.
pub fn cart_to_create_order_request(
    items: &[LineItem],
    customer: &Customer,
    waiter_id: &str,
    client_ref: Option<&str>,
) -> CreateOrderRequest {
    let table_number = customer
        .table
        .as_deref()
        .and_then(|table| table.trim().parse::<u32>().ok())
        .unwrap_or(0);

    let items = items
        .iter()
        .map(|item| {
            let removed = &item.customization.removed;
            let special_instructions = (!removed.is_empty()).then(|| {
                let names: Vec<&str> = removed.iter().map(String::as_str).collect();
                format!("Without: {}", names.join(", "))
            });
            CreateOrderItem {
                product_id: item.id.clone(),
                quantity: item.quantity,
                special_instructions,
            }
        })
        .collect();

    CreateOrderRequest {
        waiter_id: waiter_id.to_string(),
        table_number,
        items,
        customer_preferences: Some(CustomerPreferences {
            name: customer.name.clone(),
            phone: customer.phone.clone(),
            notes: customer.notes.clone(),
            client_ref: client_ref.map(str::to_string),
        }),
    }
}

fn image_list(image: &str) -> Vec<String> {
    if image.is_empty() {
        Vec::new()
    } else {
        vec![image.to_string()]
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
