//! Unit prices as carried through the cart.
//!
//! The cart never interprets a price; it only stores it and hands it back.
//! `Price` therefore keeps the JSON number exactly as it was supplied, so any
//! value a catalog sends survives a save and reload. Decimal arithmetic is
//! available through [`Price::to_decimal`] for the values that fit.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A unit price, persisted as a plain JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Number);

impl Price {
    /// Wrap a JSON number.
    #[must_use]
    pub const fn new(number: Number) -> Self {
        Self(number)
    }

    /// The underlying JSON number.
    #[must_use]
    pub const fn as_number(&self) -> &Number {
        &self.0
    }

    /// The price as a `Decimal`, or `None` if it is outside `Decimal` range.
    #[must_use]
    pub fn to_decimal(&self) -> Option<Decimal> {
        if let Some(value) = self.0.as_i64() {
            return Some(Decimal::from(value));
        }
        if let Some(value) = self.0.as_u64() {
            return Some(Decimal::from(value));
        }
        let text = self.0.to_string();
        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .ok()
    }
}

impl From<Decimal> for Price {
    fn from(value: Decimal) -> Self {
        // A Decimal always renders as a valid JSON number.
        serde_json::from_str(&value.normalize().to_string())
            .map_or_else(|_| Self(Number::from(0)), Self)
    }
}

impl From<i64> for Price {
    fn from(value: i64) -> Self {
        Self(Number::from(value))
    }
}

impl From<Number> for Price {
    fn from(value: Number) -> Self {
        Self(value)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
