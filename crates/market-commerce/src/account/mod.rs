//! Account module.
//!
//! Read-only views of shoppers and their placed orders.

mod order;
mod user;

pub use order::{Order, OrderLineItem};
pub use user::User;
