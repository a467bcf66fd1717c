//! Stock levels and requested quantities.
//!
//! The data files store stock as decimal strings (`"stock": "5"`). Internally
//! stock is a plain `u64`; the string form only exists at the serialization
//! boundary. Reading is lenient and accepts JSON numbers as well.

use core::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Units on hand for a size or variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Stock(u64);

impl Stock {
    /// Create a stock level.
    #[must_use]
    pub const fn new(units: u64) -> Self {
        Self(units)
    }

    /// Units on hand.
    #[must_use]
    pub const fn units(self) -> u64 {
        self.0
    }

    /// Whether `quantity` can be taken from this stock.
    #[must_use]
    pub const fn covers(self, quantity: Quantity) -> bool {
        quantity.get() <= self.0
    }

    /// Stock left after taking `quantity`, floored at zero.
    #[must_use]
    pub const fn take(self, quantity: Quantity) -> Self {
        Self(self.0.saturating_sub(quantity.get()))
    }

    /// Parse the loosely formatted stock found in existing data files.
    ///
    /// Empty strings count as zero, fractional values are truncated and
    /// anything unparseable or negative is treated as zero.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(units) = raw.parse::<u64>() {
            return Self(units);
        }
        Self(raw.parse::<f64>().map_or(0, float_units))
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is checked to be finite and non-negative before truncation"
)]
fn float_units(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.trunc() as u64
    } else {
        0
    }
}

impl fmt::Display for Stock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Stock {
    fn from(units: u64) -> Self {
        Self(units)
    }
}

impl Serialize for Stock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Stock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StockVisitor;

        impl Visitor<'_> for StockVisitor {
            type Value = Stock;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a stock level as a decimal string or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Stock, E> {
                Ok(Stock::parse_lenient(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Stock, E> {
                Ok(Stock(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Stock, E> {
                Ok(Stock(u64::try_from(v).unwrap_or(0)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Stock, E> {
                Ok(Stock(float_units(v)))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Stock, E> {
                Ok(Stock(0))
            }

            fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Stock, E> {
                Ok(Stock(0))
            }
        }

        deserializer.deserialize_any(StockVisitor)
    }
}

/// Errors that can occur when coercing a requested [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    /// No quantity was sent (missing or `null`).
    #[error("quantity is missing")]
    Missing,
    /// The value is not a whole number.
    #[error("quantity must be a whole number")]
    NotANumber,
    /// The value is zero or negative.
    #[error("quantity must be greater than zero")]
    NotPositive,
}

/// A requested number of units on an order line. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Quantity(u64);

impl Quantity {
    /// Create a quantity, rejecting zero.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::NotPositive`] for zero.
    pub const fn new(units: u64) -> Result<Self, QuantityError> {
        if units == 0 {
            Err(QuantityError::NotPositive)
        } else {
            Ok(Self(units))
        }
    }

    /// Number of units requested.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Coerce a raw JSON value from a client into a quantity.
    ///
    /// Integers and trimmed numeric strings are accepted. Fractions,
    /// booleans, arrays and objects are rejected.
    ///
    /// # Errors
    ///
    /// Returns a [`QuantityError`] describing why the value was rejected.
    pub fn from_value(value: Option<&Value>) -> Result<Self, QuantityError> {
        match value {
            None | Some(Value::Null) => Err(QuantityError::Missing),
            Some(Value::Number(n)) => {
                if let Some(units) = n.as_u64() {
                    Self::new(units)
                } else if n.as_i64().is_some() {
                    Err(QuantityError::NotPositive)
                } else {
                    Err(QuantityError::NotANumber)
                }
            }
            Some(Value::String(s)) => Self::parse(s),
            Some(_) => Err(QuantityError::NotANumber),
        }
    }

    fn parse(raw: &str) -> Result<Self, QuantityError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(QuantityError::Missing);
        }
        match raw.parse::<i64>() {
            Ok(units) => u64::try_from(units)
                .map_err(|_| QuantityError::NotPositive)
                .and_then(Self::new),
            Err(_) => Err(QuantityError::NotANumber),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
