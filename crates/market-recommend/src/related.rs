//! Related products for a product detail page.

use std::sync::Arc;

use market_commerce::{Product, ProductId};
use market_data::{CatalogStore, ProductFilter, ProductQuery, ProductSort};
use tracing::{debug, instrument, warn};

/// Finds products related to a reference product: same category first,
/// then same brand or store.
#[derive(Clone)]
pub struct RelatedResolver {
    store: Arc<dyn CatalogStore>,
}

impl RelatedResolver {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Up to `limit` related products. Empty when the reference is unknown.
    #[instrument(skip(self), fields(product = %product_id))]
    pub async fn related(&self, product_id: &ProductId, limit: usize) -> Vec<Product> {
        if limit == 0 {
            return Vec::new();
        }

        let reference = match self.store.find_product_by_id(product_id).await {
            Ok(Some(product)) => product,
            Ok(None) => {
                debug!("Reference product not found");
                return Vec::new();
            }
            Err(e) => {
                warn!(error = %e, "Reference product lookup failed");
                return Vec::new();
            }
        };

        let same_category = ProductQuery::new()
            .with_filter(ProductFilter::Category(reference.category.clone()))
            .with_filter(ProductFilter::exclude(reference.id.clone()))
            .with_sort(ProductSort::RatingDesc)
            .with_limit(limit);
        let mut related = match self.store.find_active_products(&same_category).await {
            Ok(products) => products,
            Err(e) => {
                warn!(error = %e, "Same-category query failed");
                return Vec::new();
            }
        };

        if related.len() < limit {
            let mut exclude = vec![reference.id.clone()];
            exclude.extend(related.iter().map(|p| p.id.clone()));

            let mut either = Vec::with_capacity(2);
            if let Some(brand) = reference.brand_name() {
                either.push(ProductFilter::brand(brand));
            }
            if !reference.store.is_empty() {
                either.push(ProductFilter::Store(reference.store.clone()));
            }

            if either.is_empty() {
                debug!("Reference has no brand or store, skipping expansion");
                return related;
            }

            let expansion = ProductQuery::new()
                .with_filter(ProductFilter::Any(either))
                .with_filter(ProductFilter::ExcludeIds(exclude))
                .with_sort(ProductSort::RatingDesc)
                .with_limit(limit - related.len());
            match self.store.find_active_products(&expansion).await {
                Ok(products) => related.extend(products),
                Err(e) => warn!(error = %e, "Brand/store expansion failed, keeping category matches"),
            }
        }

        related
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_commerce::Price;
    use market_data::{MemoryStore, StoreOp};

    fn product(id: &str, category: &str, brand: &str, store: &str, rating: f64) -> Product {
        Product::new(id, id, category, store, Price::from_cents(1000))
            .with_brand(brand)
            .with_rating(rating, 1)
    }

    fn catalog() -> MemoryStore {
        let mut products = vec![product("ref", "audio", "Sonic", "acme", 4.0)];
        for i in 0..6 {
            products.push(product(&format!("cat{i}"), "audio", "Other", "elsewhere", 3.0 + i as f64 * 0.1));
        }
        products.push(product("brand-hi", "home", "Sonic", "elsewhere", 5.0));
        products.push(product("store-mid", "books", "Pages", "acme", 4.5));
        products.push(product("unrelated", "books", "Pages", "elsewhere", 5.0));
        products.push(product("brand-off", "home", "Sonic", "acme", 5.0).inactive());
        MemoryStore::new().with_products(products)
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_category_matches_come_first() {
        let resolver = RelatedResolver::new(Arc::new(catalog()));
        let related = resolver.related(&ProductId::new("ref"), 8).await;

        assert_eq!(
            ids(&related),
            vec!["cat5", "cat4", "cat3", "cat2", "cat1", "cat0", "brand-hi", "store-mid"]
        );
    }

    #[tokio::test]
    async fn test_category_fills_limit() {
        let resolver = RelatedResolver::new(Arc::new(catalog()));
        let related = resolver.related(&ProductId::new("ref"), 2).await;
        assert_eq!(ids(&related), vec!["cat5", "cat4"]);
    }

    #[tokio::test]
    async fn test_blank_store_does_not_link_products() {
        let store = MemoryStore::new().with_products(vec![
            Product::new("ref", "ref", "audio", "", Price::from_cents(1000)),
            product("same-cat", "audio", "Other", "acme", 3.0),
            Product::new("storeless", "storeless", "books", "", Price::from_cents(1000)),
            product("same-brand", "home", "Sonic", "", 4.0),
        ]);
        let resolver = RelatedResolver::new(Arc::new(store));
        let related = resolver.related(&ProductId::new("ref"), 5).await;
        assert_eq!(ids(&related), vec!["same-cat"]);
    }

    #[tokio::test]
    async fn test_blank_store_still_expands_by_brand() {
        let store = MemoryStore::new().with_products(vec![
            Product::new("ref", "ref", "audio", "", Price::from_cents(1000)).with_brand("Sonic"),
            Product::new("storeless", "storeless", "books", "", Price::from_cents(1000)),
            product("same-brand", "home", "Sonic", "", 4.0),
        ]);
        let resolver = RelatedResolver::new(Arc::new(store));
        let related = resolver.related(&ProductId::new("ref"), 5).await;
        assert_eq!(ids(&related), vec!["same-brand"]);
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let resolver = RelatedResolver::new(Arc::new(catalog()));
        assert!(resolver.related(&ProductId::new("missing"), 4).await.is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_empty() {
        let store = catalog();
        store.fail_on(StoreOp::FindProductById);
        let resolver = RelatedResolver::new(Arc::new(store));
        assert!(resolver.related(&ProductId::new("ref"), 4).await.is_empty());
    }
}
