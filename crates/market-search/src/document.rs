//! Indexed product documents.
//!
//! Both remote engines store the same flattened product document. Ids live
//! outside the document (`_id` / `objectID`), so mapping takes the id
//! separately.

use std::collections::BTreeMap;

use market_commerce::{CategoryId, Price, Product, ProductId, StoreId};
use serde::Deserialize;
use serde_json::Value;

/// A product as stored in a search index.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedProduct {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub store: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default, alias = "original_price")]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub discount: Option<f64>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default, alias = "review_count")]
    pub review_count: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
    #[serde(default, alias = "is_featured")]
    pub is_featured: bool,
    #[serde(default, alias = "is_on_sale")]
    pub is_on_sale: bool,
    #[serde(default, alias = "created_at")]
    pub created_at: i64,
}

impl IndexedProduct {
    /// Convert into a catalog product with the given id.
    pub fn into_product(self, id: impl Into<String>) -> Product {
        let attributes = self
            .attributes
            .into_iter()
            .map(|(k, v)| {
                let value = match v {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, value)
            })
            .collect();

        Product {
            id: ProductId::new(id),
            name: self.name,
            description: self.description,
            brand: self.brand,
            category: CategoryId::new(self.category),
            store: StoreId::new(self.store),
            price: Price::from_decimal(self.price),
            original_price: self.original_price.map(Price::from_decimal),
            discount: self.discount,
            rating: self.rating,
            review_count: self.review_count,
            tags: self.tags,
            attributes,
            is_active: true,
            is_featured: self.is_featured,
            is_on_sale: self.is_on_sale,
            created_at: self.created_at,
        }
    }
}

/// Decode a raw `_source` / hit object and attach its id.
pub(crate) fn decode_product(id: &str, source: Value) -> Result<Product, serde_json::Error> {
    let doc: IndexedProduct = serde_json::from_value(source)?;
    Ok(doc.into_product(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_document() {
        let product = decode_product(
            "p-9",
            json!({
                "name": "Desk Lamp",
                "brand": "Lumo",
                "category": "home",
                "store": "acme",
                "price": 24.5,
                "reviewCount": 12,
                "attributes": {"color": "black", "watts": 40},
                "objectID": "ignored"
            }),
        )
        .unwrap();

        assert_eq!(product.id.as_str(), "p-9");
        assert_eq!(product.price.amount_cents, 2450);
        assert_eq!(product.review_count, 12);
        assert_eq!(product.attributes["watts"], "40");
        assert!(product.is_active);
    }

    #[test]
    fn test_sparse_document() {
        let product = decode_product("p-1", json!({"name": "Bare"})).unwrap();
        assert_eq!(product.rating, 0.0);
        assert!(product.tags.is_empty());
    }
}
