//! Purchase-history preference profiles.

use std::sync::Arc;

use market_commerce::{CategoryId, Order, ProductId, StoreId, UserId};
use market_data::{CatalogStore, DbError};
use serde::Serialize;
use tracing::{debug, instrument};

/// Entries kept per preference dimension.
pub const TOP_K: usize = 3;

/// A shopper's strongest affinities, derived from what they bought.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PreferenceProfile {
    pub top_categories: Vec<CategoryId>,
    pub top_brands: Vec<String>,
    pub top_stores: Vec<StoreId>,
    /// Products already purchased, never recommended again.
    pub purchased: Vec<ProductId>,
}

impl PreferenceProfile {
    /// Build a profile from resolved orders.
    ///
    /// Line items whose product no longer resolves are skipped. Each
    /// dimension is ranked by purchase frequency; equal counts keep the
    /// order in which the value was first seen.
    pub fn from_orders(orders: &[Order]) -> Self {
        let mut categories = FrequencyCounter::default();
        let mut brands = FrequencyCounter::default();
        let mut stores = FrequencyCounter::default();
        let mut purchased: Vec<ProductId> = Vec::new();

        for item in orders.iter().flat_map(|o| o.items.iter()) {
            if !purchased.contains(&item.product_id) {
                purchased.push(item.product_id.clone());
            }
            let Some(product) = &item.product else {
                debug!(product = %item.product_id, "Skipping order line for missing product");
                continue;
            };
            categories.add(product.category.clone());
            if let Some(brand) = product.brand_name() {
                brands.add(brand.to_string());
            }
            stores.add(product.store.clone());
        }

        Self {
            top_categories: categories.top(TOP_K),
            top_brands: brands.top(TOP_K),
            top_stores: stores.top(TOP_K),
            purchased,
        }
    }

    /// Whether any preference signal exists.
    pub fn has_signals(&self) -> bool {
        !(self.top_categories.is_empty() && self.top_brands.is_empty() && self.top_stores.is_empty())
    }
}

/// Counts kept in first-seen order.
#[derive(Debug)]
struct FrequencyCounter<K> {
    counts: Vec<(K, u32)>,
}

impl<K> Default for FrequencyCounter<K> {
    fn default() -> Self {
        Self { counts: Vec::new() }
    }
}

impl<K: PartialEq> FrequencyCounter<K> {
    fn add(&mut self, key: K) {
        match self.counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((key, 1)),
        }
    }

    fn top(mut self, k: usize) -> Vec<K> {
        // Stable: ties stay in first-seen order.
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts.into_iter().take(k).map(|(key, _)| key).collect()
    }
}

/// Builds preference profiles from the catalog store.
#[derive(Clone)]
pub struct PreferenceProfiler {
    store: Arc<dyn CatalogStore>,
}

impl PreferenceProfiler {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Profile a user from their order history.
    #[instrument(skip(self), fields(user = %user_id))]
    pub async fn build_profile(&self, user_id: &UserId) -> Result<PreferenceProfile, DbError> {
        let orders = self.store.find_orders_by_user(user_id).await?;
        let profile = PreferenceProfile::from_orders(&orders);
        debug!(
            orders = orders.len(),
            categories = profile.top_categories.len(),
            purchased = profile.purchased.len(),
            "Built preference profile"
        );
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_commerce::{OrderLineItem, Price, Product};
    use market_data::{MemoryStore, StoreOp};

    fn bought(id: &str, category: &str, brand: Option<&str>, store: &str) -> OrderLineItem {
        let mut product = Product::new(id, id, category, store, Price::from_cents(1000));
        if let Some(brand) = brand {
            product = product.with_brand(brand);
        }
        OrderLineItem::resolved(product, 1)
    }

    #[test]
    fn test_top_k_with_first_seen_ties() {
        // Frequencies A:5, C:3, B:3, D:1, with C encountered before B.
        let mut items = Vec::new();
        items.push(bought("a0", "A", None, "s"));
        items.push(bought("c0", "C", None, "s"));
        items.push(bought("d0", "D", None, "s"));
        items.push(bought("b0", "B", None, "s"));
        for i in 1..5 {
            items.push(bought(&format!("a{i}"), "A", None, "s"));
        }
        for i in 1..3 {
            items.push(bought(&format!("b{i}"), "B", None, "s"));
            items.push(bought(&format!("c{i}"), "C", None, "s"));
        }
        let profile = PreferenceProfile::from_orders(&[Order::new("o1", "u1", items)]);

        assert_eq!(
            profile.top_categories,
            vec![CategoryId::new("A"), CategoryId::new("C"), CategoryId::new("B")]
        );
        assert_eq!(profile.top_stores, vec![StoreId::new("s")]);
        assert!(profile.top_brands.is_empty());
    }

    #[test]
    fn test_dangling_lines_are_skipped() {
        let items = vec![
            bought("p1", "audio", Some("Sonic"), "acme"),
            OrderLineItem::new("gone", 2),
        ];
        let profile = PreferenceProfile::from_orders(&[Order::new("o1", "u1", items)]);

        assert_eq!(profile.top_categories, vec![CategoryId::new("audio")]);
        assert_eq!(profile.top_brands, vec!["Sonic".to_string()]);
        assert_eq!(profile.purchased, vec![ProductId::new("p1"), ProductId::new("gone")]);
    }

    #[test]
    fn test_no_orders() {
        let profile = PreferenceProfile::from_orders(&[]);
        assert_eq!(profile, PreferenceProfile::default());
        assert!(!profile.has_signals());
    }

    #[tokio::test]
    async fn test_profiler_reads_store() {
        let store = MemoryStore::new()
            .with_product(Product::new("p1", "Lamp", "home", "lumo", Price::from_cents(2450)))
            .with_order(Order::new("o1", "u1", vec![OrderLineItem::new("p1", 1)]));
        let profiler = PreferenceProfiler::new(Arc::new(store));

        let profile = profiler.build_profile(&UserId::new("u1")).await.unwrap();
        assert_eq!(profile.top_categories, vec![CategoryId::new("home")]);

        let empty = profiler.build_profile(&UserId::new("nobody")).await.unwrap();
        assert!(!empty.has_signals());
    }

    #[tokio::test]
    async fn test_profiler_propagates_store_failure() {
        let store = MemoryStore::new();
        store.fail_on(StoreOp::FindOrdersByUser);
        let profiler = PreferenceProfiler::new(Arc::new(store));
        assert!(profiler.build_profile(&UserId::new("u1")).await.is_err());
    }
}
