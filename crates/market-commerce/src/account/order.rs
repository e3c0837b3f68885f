//! Order types.

use crate::catalog::Product;
use crate::ids::{OrderId, ProductId, UserId};
use serde::{Deserialize, Serialize};

/// A line item in a placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    /// Product referenced at purchase time.
    pub product_id: ProductId,
    /// The product record, when it still resolves in the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    /// Quantity ordered.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl OrderLineItem {
    /// Create a line item referencing a product id.
    pub fn new(product_id: impl Into<ProductId>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            product: None,
            quantity,
        }
    }

    /// Create a line item with the product already resolved.
    pub fn resolved(product: Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            product: Some(product),
            quantity,
        }
    }
}

/// A placed order. Immutable once placed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Owning user.
    pub user: UserId,
    /// Line items in purchase order.
    #[serde(default)]
    pub items: Vec<OrderLineItem>,
    /// Unix timestamp the order was placed.
    #[serde(default)]
    pub placed_at: i64,
}

impl Order {
    /// Create an order.
    pub fn new(id: impl Into<OrderId>, user: impl Into<UserId>, items: Vec<OrderLineItem>) -> Self {
        Self {
            id: id.into(),
            user: user.into(),
            items,
            placed_at: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price::Price;

    #[test]
    fn test_resolved_line_keeps_product_id() {
        let product = Product::new("p-1", "Tent", "outdoor", "camp", Price::from_cents(9900));
        let item = OrderLineItem::resolved(product, 2);
        assert_eq!(item.product_id.as_str(), "p-1");
        assert_eq!(item.quantity, 2);
        assert!(item.product.is_some());
    }

    #[test]
    fn test_line_item_default_quantity() {
        let item: OrderLineItem = serde_json::from_str(r#"{"productId": "p-1"}"#).unwrap();
        assert_eq!(item.quantity, 1);
        assert!(item.product.is_none());
    }
}
