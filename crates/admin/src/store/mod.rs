//! Persistence for the admin backend.
//!
//! # Data directory (`ADMIN_DATA_DIR`)
//!
//! ## Files
//!
//! - `products.json` - Product catalog (sizes/variants with string stock)
//! - `category.json` - Free-form category records
//! - `order.json` - Placed orders, stored verbatim
//!
//! Each file is a pretty-printed JSON array that is read and rewritten whole.
//! There is no indexing, versioning or cross-process locking. Within the
//! process, every read-modify-write goes through a [`SharedStore`] guard.

mod json_file;
mod shared;

use async_trait::async_trait;
use thiserror::Error;

pub use json_file::JsonFileStore;
pub use shared::{SharedStore, StoreGuard};

/// File name of the product catalog inside the data directory.
pub const PRODUCTS_FILE: &str = "products.json";
/// File name of the category list inside the data directory.
pub const CATEGORIES_FILE: &str = "category.json";
/// File name of the order list inside the data directory.
pub const ORDERS_FILE: &str = "order.json";

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but does not hold a JSON array of the expected records.
    #[error("data corruption in {path}: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Records could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A whole-collection store: every read returns all records and every write
/// replaces all records.
#[async_trait]
pub trait Store<T>: Send + Sync {
    /// Load every record. A store that has never been written reads as empty.
    async fn read(&self) -> Result<Vec<T>, StoreError>;

    /// Replace the stored collection with `records`.
    async fn write(&self, records: &[T]) -> Result<(), StoreError>;
}
