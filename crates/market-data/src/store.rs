//! The catalog data-access contract.

use crate::error::DbError;
use crate::filter::ProductFilter;
use crate::query::ProductQuery;
use async_trait::async_trait;
use market_commerce::{Order, Product, ProductId, User, UserId};

/// Read-only access to products, orders and users.
///
/// Implementations only ever return active products from the
/// `*_active_products` methods; `find_product_by_id` returns the record
/// regardless of activity so callers can decide.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Active products matching `query`, sorted and windowed.
    async fn find_active_products(&self, query: &ProductQuery) -> Result<Vec<Product>, DbError>;

    /// Number of active products matching every filter.
    async fn count_active_products(&self, filters: &[ProductFilter]) -> Result<u64, DbError>;

    async fn find_product_by_id(&self, id: &ProductId) -> Result<Option<Product>, DbError>;

    /// A user's orders, with each line item's product resolved when it still exists.
    async fn find_orders_by_user(&self, user_id: &UserId) -> Result<Vec<Order>, DbError>;

    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError>;
}
