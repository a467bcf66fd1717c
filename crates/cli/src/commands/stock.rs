//! Stock report across the catalog.

use tracing::info;

use nb_collection_admin::config::StorageConfig;
use nb_collection_admin::models::Product;
use nb_collection_admin::store::{JsonFileStore, Store, StoreError};
use nb_collection_core::{ProductId, Stock};

/// Stock held by one size, variant or legacy product-level field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLine {
    pub product_id: ProductId,
    pub product: String,
    pub size: String,
    pub color: Option<String>,
    pub stock: Stock,
}

fn size_label(name: &str) -> String {
    if name.is_empty() {
        "default".to_string()
    } else {
        name.to_string()
    }
}

/// Every stock level in `products`, in catalog order. With `below`, only
/// levels strictly under that threshold are kept.
#[must_use]
pub fn stock_lines(products: &[Product], below: Option<u64>) -> Vec<StockLine> {
    let mut lines = Vec::new();

    for product in products {
        let line = |size: &str, color: Option<&str>, stock: Stock| StockLine {
            product_id: product.id.clone(),
            product: product.name.clone(),
            size: size_label(size),
            color: color.map(str::to_string),
            stock,
        };

        for size in product.sizes.iter().flatten() {
            lines.push(line(&size.name, None, size.stock));
        }
        for variant in product.variants.iter().flatten() {
            lines.push(line(&variant.size, Some(&variant.color), variant.stock));
        }
        if let Some(stock) = product.stock {
            lines.push(line("", None, stock));
        }
    }

    if let Some(threshold) = below {
        lines.retain(|l| l.stock.units() < threshold);
    }
    lines
}

/// Log the stock report for the configured catalog.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read.
pub async fn report(storage: &StorageConfig, below: Option<u64>) -> Result<(), StoreError> {
    let products = JsonFileStore::<Product>::new(storage.products_path())
        .read()
        .await?;
    let lines = stock_lines(&products, below);

    for line in &lines {
        info!(
            product_id = %line.product_id,
            size = %line.size,
            color = line.color.as_deref().unwrap_or("-"),
            stock = line.stock.units(),
            "{}",
            line.product
        );
    }
    info!(products = products.len(), entries = lines.len(), "Stock report complete");
    Ok(())
}
