//! In-memory catalog store.
//!
//! Backs the CLI fixtures and the test suites. Operations can be made to fail
//! on demand to exercise degradation paths.

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use market_commerce::{Order, Product, ProductId, User, UserId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DbError;
use crate::filter::{matches_all, ProductFilter};
use crate::query::ProductQuery;
use crate::store::CatalogStore;

/// Store operations, used to inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    FindActiveProducts,
    CountActiveProducts,
    FindProductById,
    FindOrdersByUser,
    FindUserById,
}

/// Serialized catalog snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFixture {
    #[serde(default)]
    pub products: Vec<Product>,
    /// Orders as stored: line items reference products by id only.
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub users: Vec<User>,
}

/// Catalog store holding everything in memory, in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: Vec<Product>,
    orders: Vec<Order>,
    users: Vec<User>,
    failing: Mutex<HashSet<StoreOp>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a fixture.
    pub fn from_fixture(fixture: CatalogFixture) -> Self {
        Self {
            products: fixture.products,
            orders: fixture.orders,
            users: fixture.users,
            failing: Mutex::new(HashSet::new()),
        }
    }

    /// Load a JSON fixture from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let fixture: CatalogFixture = serde_json::from_str(&content)?;
        Ok(Self::from_fixture(fixture))
    }

    pub fn with_product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }

    pub fn with_products(mut self, products: impl IntoIterator<Item = Product>) -> Self {
        self.products.extend(products);
        self
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    /// Make an operation fail with [`DbError::Unavailable`] until restored.
    pub fn fail_on(&self, op: StoreOp) {
        self.failing().insert(op);
    }

    /// Make every operation fail.
    pub fn fail_all(&self) {
        for op in [
            StoreOp::FindActiveProducts,
            StoreOp::CountActiveProducts,
            StoreOp::FindProductById,
            StoreOp::FindOrdersByUser,
            StoreOp::FindUserById,
        ] {
            self.fail_on(op);
        }
    }

    /// Clear all injected failures.
    pub fn restore(&self) {
        self.failing().clear();
    }

    fn failing(&self) -> MutexGuard<'_, HashSet<StoreOp>> {
        self.failing.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self, op: StoreOp) -> Result<(), DbError> {
        if self.failing().contains(&op) {
            return Err(DbError::Unavailable(format!("{:?} is unavailable", op)));
        }
        Ok(())
    }

    fn active_matching<'a>(
        &'a self,
        filters: &'a [ProductFilter],
    ) -> impl Iterator<Item = &'a Product> + 'a {
        self.products
            .iter()
            .filter(move |p| p.is_active && matches_all(filters, p))
    }

    fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn find_active_products(&self, query: &ProductQuery) -> Result<Vec<Product>, DbError> {
        self.check(StoreOp::FindActiveProducts)?;
        let candidates: Vec<Product> = self.active_matching(&query.filters).cloned().collect();
        debug!(candidates = candidates.len(), "memory store product scan");
        Ok(query.paginate(candidates))
    }

    async fn count_active_products(&self, filters: &[ProductFilter]) -> Result<u64, DbError> {
        self.check(StoreOp::CountActiveProducts)?;
        Ok(self.active_matching(filters).count() as u64)
    }

    async fn find_product_by_id(&self, id: &ProductId) -> Result<Option<Product>, DbError> {
        self.check(StoreOp::FindProductById)?;
        Ok(self.product(id).cloned())
    }

    async fn find_orders_by_user(&self, user_id: &UserId) -> Result<Vec<Order>, DbError> {
        self.check(StoreOp::FindOrdersByUser)?;
        let orders = self
            .orders
            .iter()
            .filter(|o| &o.user == user_id)
            .map(|order| {
                let mut order = order.clone();
                for item in &mut order.items {
                    if item.product.is_none() {
                        item.product = self.product(&item.product_id).cloned();
                    }
                }
                order
            })
            .collect();
        Ok(orders)
    }

    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
        self.check(StoreOp::FindUserById)?;
        Ok(self.users.iter().find(|u| &u.id == id).cloned())
    }
}
