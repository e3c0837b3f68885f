//! Product record.

use crate::ids::{CategoryId, ProductId, StoreId};
use crate::price::Price;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A product in the catalog.
///
/// `rating` and `review_count` are independent signals: a product may carry a
/// rating while having zero reviews.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Full description.
    #[serde(default)]
    pub description: String,
    /// Brand name, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Category this product belongs to.
    pub category: CategoryId,
    /// Store selling this product.
    pub store: StoreId,
    /// Current selling price.
    pub price: Price,
    /// Price before discount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    /// Discount percentage (0-100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    /// Average rating, 0 to 5.
    #[serde(default)]
    pub rating: f64,
    /// Number of reviews.
    #[serde(default)]
    pub review_count: u32,
    /// Tags for filtering/search.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-form attributes (e.g., color, size).
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_on_sale: bool,
    /// Unix timestamp of creation.
    #[serde(default)]
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Create a new active product with the required fields.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        category: impl Into<CategoryId>,
        store: impl Into<StoreId>,
        price: Price,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            brand: None,
            category: category.into(),
            store: store.into(),
            price,
            original_price: None,
            discount: None,
            rating: 0.0,
            review_count: 0,
            tags: Vec::new(),
            attributes: BTreeMap::new(),
            is_active: true,
            is_featured: false,
            is_on_sale: false,
            created_at: 0,
        }
    }

    /// Set the brand.
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set rating and review count.
    pub fn with_rating(mut self, rating: f64, review_count: u32) -> Self {
        self.rating = rating.clamp(0.0, 5.0);
        self.review_count = review_count;
        self
    }

    /// Add a tag to this product.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    pub fn featured(mut self) -> Self {
        self.is_featured = true;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Mark as on sale from an original price.
    pub fn on_sale_from(mut self, original_price: Price) -> Self {
        self.original_price = Some(original_price);
        self.discount = self.discount_percentage();
        self.is_on_sale = self.discount.is_some();
        self
    }

    pub fn created_at(mut self, ts: i64) -> Self {
        self.created_at = ts;
        self
    }

    /// Discount percentage implied by the original price, if it is higher.
    pub fn discount_percentage(&self) -> Option<f64> {
        self.original_price.and_then(|orig| {
            if orig.amount_cents > self.price.amount_cents {
                let savings = orig.amount_cents - self.price.amount_cents;
                Some((savings as f64 / orig.amount_cents as f64) * 100.0)
            } else {
                None
            }
        })
    }

    /// The brand, if present and not blank.
    pub fn brand_name(&self) -> Option<&str> {
        self.brand.as_deref().map(str::trim).filter(|b| !b.is_empty())
    }
}
