//! Catalog data access for the marketplace resolution engine.
//!
//! This crate provides:
//! - `CatalogStore` - The read-only data-access contract
//! - `ProductFilter` / `ProductQuery` / `ProductSort` - Store-agnostic predicates
//! - `text` - Degraded keyword matching with field weights and typo tolerance
//! - `MemoryStore` - Reference in-memory implementation with failure injection

mod error;
mod filter;
mod memory;
mod query;
mod store;
pub mod text;

pub use error::DbError;
pub use filter::{matches_all, ProductFilter};
pub use memory::{CatalogFixture, MemoryStore, StoreOp};
pub use query::{ProductQuery, ProductSort};
pub use store::CatalogStore;
