//! Core types for NB Collection.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod contact;
pub mod id;
pub mod price;
pub mod stock;

pub use contact::{Phone, PhoneError, PostalCode, PostalCodeError};
pub use id::*;
pub use price::Price;
pub use stock::{Quantity, QuantityError, Stock};
