//! Seed the catalog from a YAML file.
//!
//! ```yaml
//! products:
//!   - name: Jamdani Saree
//!     price: "4500"
//!     category: "1718000000000"
//!     sizes:
//!       - { name: "", stock: 4 }
//!   - name: Cotton Panjabi
//!     price: "1800"
//!     sizes:
//!       - { name: M, stock: 10 }
//!       - { name: L, stock: 6 }
//! ```
//!
//! Each entry gets a fresh id and a creation date; any other fields are
//! stored as given.

use std::path::Path;

use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, info};

use nb_collection_admin::config::StorageConfig;
use nb_collection_admin::models::{Product, value_text};
use nb_collection_admin::store::{JsonFileStore, Store, StoreError};
use nb_collection_core::ProductId;

/// Errors from seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0} validation errors found")]
    Invalid(usize),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    products: Vec<Map<String, Value>>,
}

/// Turn raw YAML entries into products with ids above everything in
/// `existing`. Returns one message per invalid entry instead.
fn build_products(
    entries: Vec<Map<String, Value>>,
    existing: &[Product],
) -> Result<Vec<Product>, Vec<String>> {
    let mut ids: Vec<ProductId> = existing.iter().map(|p| p.id.clone()).collect();
    let mut products = Vec::with_capacity(entries.len());
    let mut errors = Vec::new();

    for (index, mut entry) in entries.into_iter().enumerate() {
        let named = entry
            .get("name")
            .and_then(value_text)
            .is_some_and(|n| !n.trim().is_empty());
        if !named {
            errors.push(format!("products[{index}]: name is required"));
            continue;
        }

        let id = ProductId::generate(&ids);
        entry.insert("id".to_string(), id.as_value().clone());
        entry
            .entry("creation_date")
            .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));

        match serde_json::from_value::<Product>(Value::Object(entry)) {
            Ok(product) => {
                ids.push(id);
                products.push(product);
            }
            Err(e) => errors.push(format!("products[{index}]: {e}")),
        }
    }

    if errors.is_empty() {
        Ok(products)
    } else {
        Err(errors)
    }
}

/// Append the products in `file` to the catalog. Nothing is written when
/// any entry is invalid.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, an entry is
/// invalid, or the catalog cannot be written.
pub async fn products(storage: &StorageConfig, file: &Path) -> Result<usize, SeedError> {
    let display = file.display().to_string();
    if !file.exists() {
        return Err(SeedError::NotFound(display));
    }

    info!(path = %file.display(), "Loading products from file");
    let content = tokio::fs::read_to_string(file)
        .await
        .map_err(|source| SeedError::Read {
            path: display.clone(),
            source,
        })?;
    let seed: SeedFile = serde_yaml::from_str(&content)?;
    info!(entries = seed.products.len(), "Parsed seed file");

    let store = JsonFileStore::<Product>::new(storage.products_path());
    store.ensure_exists().await?;
    let mut catalog = store.read().await?;

    let added = match build_products(seed.products, &catalog) {
        Ok(added) => added,
        Err(errors) => {
            error!("Seed validation failed:");
            for err in &errors {
                error!("  - {err}");
            }
            return Err(SeedError::Invalid(errors.len()));
        }
    };

    let count = added.len();
    catalog.extend(added);
    store.write(&catalog).await?;

    info!(added = count, total = catalog.len(), "Seeding complete");
    Ok(count)
}
