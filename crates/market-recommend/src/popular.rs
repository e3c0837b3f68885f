//! Popularity ranking, the terminal fallback for every ranking path.

use std::sync::Arc;

use market_commerce::Product;
use market_data::{CatalogStore, ProductFilter, ProductQuery, ProductSort};
use tracing::{instrument, warn};

/// Minimum rating for a product to count as popular.
pub const MIN_POPULAR_RATING: f64 = 4.0;
/// Minimum number of reviews for a product to count as popular.
pub const MIN_POPULAR_REVIEWS: u32 = 5;

/// Ranks well-reviewed products, backfilled with featured ones.
#[derive(Clone)]
pub struct PopularityRanker {
    store: Arc<dyn CatalogStore>,
}

impl PopularityRanker {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Up to `limit` popular products. Never fails; store errors shrink the result.
    #[instrument(skip(self))]
    pub async fn popular(&self, limit: usize) -> Vec<Product> {
        if limit == 0 {
            return Vec::new();
        }

        let query = ProductQuery::new()
            .with_filter(ProductFilter::Rating {
                min: MIN_POPULAR_RATING,
            })
            .with_filter(ProductFilter::MinReviews(MIN_POPULAR_REVIEWS))
            .with_sort(ProductSort::Popularity)
            .with_limit(limit);
        let mut popular = match self.store.find_active_products(&query).await {
            Ok(products) => products,
            Err(e) => {
                warn!(error = %e, "Popular product query failed");
                Vec::new()
            }
        };

        if popular.len() < limit {
            let selected = popular.iter().map(|p| p.id.clone()).collect();
            let backfill = ProductQuery::new()
                .with_filter(ProductFilter::Featured)
                .with_filter(ProductFilter::ExcludeIds(selected))
                .with_limit(limit - popular.len());
            match self.store.find_active_products(&backfill).await {
                Ok(featured) => popular.extend(featured),
                Err(e) => warn!(error = %e, "Featured backfill query failed"),
            }
        }

        popular
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_commerce::Price;
    use market_data::{MemoryStore, StoreOp};
    use std::collections::HashSet;

    fn product(id: &str, rating: f64, reviews: u32) -> Product {
        Product::new(id, id, "c", "s", Price::from_cents(1000)).with_rating(rating, reviews)
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    fn catalog() -> MemoryStore {
        MemoryStore::new().with_products(vec![
            product("f1", 3.0, 1).featured(),
            product("top", 4.8, 6).featured(),
            product("few-reviews", 5.0, 2),
            product("mid", 4.2, 40),
            product("f2", 2.0, 0).featured(),
            product("low", 3.9, 100),
            product("same-rating", 4.2, 10),
            product("f3", 4.0, 0).featured().inactive(),
        ])
    }

    #[tokio::test]
    async fn test_rating_then_reviews() {
        let ranker = PopularityRanker::new(Arc::new(catalog()));
        let popular = ranker.popular(3).await;
        assert_eq!(ids(&popular), vec!["top", "mid", "same-rating"]);
    }

    #[tokio::test]
    async fn test_backfill_without_duplicates() {
        let ranker = PopularityRanker::new(Arc::new(catalog()));
        let popular = ranker.popular(10).await;

        // Three qualify; featured backfill follows in catalog order, skipping "top".
        assert_eq!(ids(&popular), vec!["top", "mid", "same-rating", "f1", "f2"]);
        let unique: HashSet<&str> = ids(&popular).into_iter().collect();
        assert_eq!(unique.len(), popular.len());
    }

    #[tokio::test]
    async fn test_zero_limit_and_failures() {
        let store = catalog();
        let ranker = PopularityRanker::new(Arc::new(MemoryStore::new()));
        assert!(ranker.popular(0).await.is_empty());
        assert!(ranker.popular(5).await.is_empty());

        store.fail_on(StoreOp::FindActiveProducts);
        let ranker = PopularityRanker::new(Arc::new(store));
        assert!(ranker.popular(5).await.is_empty());
    }
}
