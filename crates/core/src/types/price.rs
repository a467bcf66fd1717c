//! Product prices using decimal arithmetic.
//!
//! Prices arrive from multipart forms as text (`"1250"`, `"99.50"`) and are
//! stored as strings in the catalog file, matching what the storefront
//! already reads.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("price must be a decimal number")]
    Invalid,
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative price in the shop's currency (BDT).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Parse a price from text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a decimal number or is negative.
    pub fn parse(raw: &str) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(raw.trim()).map_err(|_| PriceError::Invalid)?;
        Self::try_from(amount)
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Deserialize an optional price, treating `null`, empty strings and
    /// unparseable legacy values as absent.
    ///
    /// Use with `#[serde(default, deserialize_with = "Price::deserialize_optional")]`.
    ///
    /// # Errors
    ///
    /// Only fails when the underlying deserializer fails.
    pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<Self>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => Self::parse(&s).ok(),
            Some(Value::Number(n)) => Self::parse(&n.to_string()).ok(),
            _ => None,
        })
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
