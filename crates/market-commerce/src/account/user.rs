//! Shopper record.

use crate::ids::{ProductId, UserId};
use serde::{Deserialize, Serialize};

/// A shopper. Read-only input to the resolution engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    /// Wishlisted products, most recently added last.
    #[serde(default)]
    pub wishlist: Vec<ProductId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            wishlist: Vec::new(),
            name: None,
            email: None,
        }
    }

    /// Add a product to the wishlist, ignoring duplicates.
    pub fn with_wishlisted(mut self, product_id: impl Into<ProductId>) -> Self {
        let product_id = product_id.into();
        if !self.wishlist.contains(&product_id) {
            self.wishlist.push(product_id);
        }
        self
    }
}
