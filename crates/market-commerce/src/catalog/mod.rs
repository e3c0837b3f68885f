//! Catalog module.
//!
//! Contains the product record as owned by the data-access layer.

mod product;

pub use product::Product;
