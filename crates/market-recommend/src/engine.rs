//! Personalized recommendations.

use std::collections::HashSet;
use std::sync::Arc;

use market_commerce::{Product, ProductId, User, UserId};
use market_data::{CatalogStore, DbError, ProductFilter, ProductQuery, ProductSort};
use tracing::{debug, instrument, warn};

use crate::deals::DealsFeed;
use crate::popular::PopularityRanker;
use crate::profile::{PreferenceProfile, PreferenceProfiler};
use crate::related::RelatedResolver;

/// Wishlist products placed ahead of preference matches.
pub const WISHLIST_LIMIT: usize = 5;

/// Every ranking surface over one catalog store. No method fails: data
/// errors degrade to popular products or to an empty list.
#[derive(Clone)]
pub struct RecommendationEngine {
    store: Arc<dyn CatalogStore>,
    profiler: PreferenceProfiler,
    popularity: PopularityRanker,
    related: RelatedResolver,
    deals: DealsFeed,
}

impl RecommendationEngine {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            profiler: PreferenceProfiler::new(store.clone()),
            popularity: PopularityRanker::new(store.clone()),
            related: RelatedResolver::new(store.clone()),
            deals: DealsFeed::new(store.clone()),
            store,
        }
    }

    /// Up to `limit` products for a shopper: wishlist items first, then
    /// products matching their purchase preferences. Anonymous or unknown
    /// shoppers, and shoppers without signals, get popular products.
    #[instrument(skip(self), fields(user = user_id.map(UserId::as_str).unwrap_or("anonymous")))]
    pub async fn recommend(&self, user_id: Option<&UserId>, limit: usize) -> Vec<Product> {
        if limit == 0 {
            return Vec::new();
        }
        let Some(user_id) = user_id else {
            return self.popularity.popular(limit).await;
        };

        match self.personalized(user_id, limit).await {
            Ok(products) if !products.is_empty() => products,
            Ok(_) => {
                debug!("No personal recommendations, serving popular products");
                self.popularity.popular(limit).await
            }
            Err(e) => {
                warn!(error = %e, "Recommendation failed, serving popular products");
                self.popularity.popular(limit).await
            }
        }
    }

    pub async fn related(&self, product_id: &ProductId, limit: usize) -> Vec<Product> {
        self.related.related(product_id, limit).await
    }

    pub async fn popular(&self, limit: usize) -> Vec<Product> {
        self.popularity.popular(limit).await
    }

    pub async fn on_sale(&self, limit: usize) -> Vec<Product> {
        self.deals.on_sale(limit).await
    }

    /// Build a shopper's preference profile.
    pub async fn profile(&self, user_id: &UserId) -> Result<PreferenceProfile, DbError> {
        self.profiler.build_profile(user_id).await
    }

    async fn personalized(&self, user_id: &UserId, limit: usize) -> Result<Vec<Product>, DbError> {
        let Some(user) = self.store.find_user_by_id(user_id).await? else {
            debug!("Unknown user");
            return Ok(Vec::new());
        };
        let profile = self.profiler.build_profile(&user.id).await?;

        let (wishlist, matches) = futures::join!(
            self.wishlist(&user),
            self.preference_matches(&profile, limit)
        );

        let mut seen = HashSet::new();
        Ok(wishlist?
            .into_iter()
            .chain(matches?)
            .filter(|p| seen.insert(p.id.clone()))
            .take(limit)
            .collect())
    }

    /// Active wishlist products in wishlist order.
    async fn wishlist(&self, user: &User) -> Result<Vec<Product>, DbError> {
        if user.wishlist.is_empty() {
            return Ok(Vec::new());
        }
        let query = ProductQuery::new().with_filter(ProductFilter::Ids(user.wishlist.clone()));
        let mut products = self.store.find_active_products(&query).await?;
        products.sort_by_key(|p| {
            user.wishlist
                .iter()
                .position(|id| id == &p.id)
                .unwrap_or(usize::MAX)
        });
        products.truncate(WISHLIST_LIMIT);
        Ok(products)
    }

    /// Top-rated products sharing any preferred category, brand or store.
    async fn preference_matches(
        &self,
        profile: &PreferenceProfile,
        limit: usize,
    ) -> Result<Vec<Product>, DbError> {
        if !profile.has_signals() {
            return Ok(Vec::new());
        }

        let mut any = Vec::with_capacity(3);
        if !profile.top_categories.is_empty() {
            any.push(ProductFilter::Categories(profile.top_categories.clone()));
        }
        if !profile.top_brands.is_empty() {
            any.push(ProductFilter::Brands(profile.top_brands.clone()));
        }
        if !profile.top_stores.is_empty() {
            any.push(ProductFilter::Stores(profile.top_stores.clone()));
        }

        let query = ProductQuery::new()
            .with_filter(ProductFilter::Any(any))
            .with_filter(ProductFilter::ExcludeIds(profile.purchased.clone()))
            .with_sort(ProductSort::RatingDesc)
            .with_limit(limit.saturating_mul(2));
        self.store.find_active_products(&query).await
    }
}
