//! On-sale product feed.

use std::sync::Arc;

use market_commerce::Product;
use market_data::{CatalogStore, ProductFilter, ProductQuery, ProductSort};
use tracing::{instrument, warn};

/// Products on sale, deepest discount first.
#[derive(Clone)]
pub struct DealsFeed {
    store: Arc<dyn CatalogStore>,
}

impl DealsFeed {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Up to `limit` active products on sale with a positive discount.
    #[instrument(skip(self))]
    pub async fn on_sale(&self, limit: usize) -> Vec<Product> {
        if limit == 0 {
            return Vec::new();
        }
        let query = ProductQuery::new()
            .with_filter(ProductFilter::OnSale)
            .with_sort(ProductSort::DiscountDesc)
            .with_limit(limit);
        self.store.find_active_products(&query).await.unwrap_or_else(|e| {
            warn!(error = %e, "On-sale query failed");
            Vec::new()
        })
    }
}
