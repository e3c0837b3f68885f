//! Price type for catalog amounts.
//!
//! Stored as integer cents so that range filters and price sorting compare
//! exactly; serialized as a decimal number because that is what the search
//! backends and the catalog fixtures carry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A catalog price in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Price {
    /// Amount in cents.
    pub amount_cents: i64,
}

impl Price {
    /// Create a price from cents.
    pub fn from_cents(amount_cents: i64) -> Self {
        Self { amount_cents }
    }

    /// Create a price from a decimal amount, rounding to the nearest cent.
    ///
    /// ```
    /// use market_commerce::Price;
    /// let price = Price::from_decimal(79.99);
    /// assert_eq!(price.amount_cents, 7999);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        if !amount.is_finite() {
            return Self::default();
        }
        Self::from_cents((amount * 100.0).round() as i64)
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        self.amount_cents as f64 / 100.0
    }

    /// Clamp negative amounts to zero.
    pub fn non_negative(self) -> Self {
        Self::from_cents(self.amount_cents.max(0))
    }

    /// Format as a display string without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        format!("{:.2}", self.to_decimal())
    }
}

impl From<f64> for Price {
    fn from(amount: f64) -> Self {
        Price::from_decimal(amount)
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> Self {
        price.to_decimal()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.display_amount())
    }
}
