//! NB Collection Core - Shared types library.
//!
//! This crate provides common types used across all NB Collection components:
//! - `admin` - HTTP backend for catalog, categories and orders
//! - `cli` - Command-line tools for data-file management
//!
//! # Architecture
//!
//! The core crate contains only types and parsing rules - no file I/O and no
//! HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, stock levels, prices, phone numbers
//!   and postal codes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
