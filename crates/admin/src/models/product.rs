//! Product catalog records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use nb_collection_core::{Price, ProductId, Quantity, Stock};

use super::{lenient_optional_string, lenient_string};

/// A product as stored in `products.json`.
///
/// A product carries stock either per size (`sizes`) or per color/size
/// combination (`variants`). Older records may only have a top-level
/// `stock` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "ProductId::is_missing")]
    pub id: ProductId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "Price::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Price>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    /// Category id, compared loosely as text.
    #[serde(
        default,
        deserialize_with = "lenient_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<SizeVariant>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<ColorVariant>>,
    /// Legacy product-level stock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<Stock>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A named size with its own stock, e.g. `{"name": "M", "stock": "5"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeVariant {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default)]
    pub stock: Stock,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A color/size combination with its own stock and images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorVariant {
    #[serde(default, deserialize_with = "lenient_string")]
    pub size: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub color: String,
    #[serde(default)]
    pub stock: Stock,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Where a line item's stock lives on a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockSlot {
    /// Index into `sizes`.
    Size(usize),
    /// Index into `variants`.
    Variant(usize),
    /// The legacy top-level `stock` field.
    Product,
}

impl Product {
    /// Create an empty product with a fresh id and creation time.
    #[must_use]
    pub fn new(id: ProductId) -> Self {
        Self {
            id,
            name: String::new(),
            price: None,
            description: String::new(),
            category: None,
            creation_date: Some(Utc::now()),
            images: Vec::new(),
            sizes: None,
            variants: None,
            stock: None,
            extra: Map::new(),
        }
    }

    /// Find the size (or variant) an order line refers to.
    ///
    /// An exact name match wins. When there is no match but the product has
    /// exactly one entry, that entry is used, which covers single-variant
    /// products whose size name is empty or a placeholder. Variants are only
    /// consulted when the product has no size list; `color`, when given,
    /// must also match.
    #[must_use]
    pub fn resolve_size(&self, size: &str, color: Option<&str>) -> Option<StockSlot> {
        if let Some(sizes) = self.sizes.as_deref().filter(|s| !s.is_empty()) {
            return sizes
                .iter()
                .position(|s| s.name == size)
                .or_else(|| (sizes.len() == 1).then_some(0))
                .map(StockSlot::Size);
        }

        let variants = self.variants.as_deref().filter(|v| !v.is_empty())?;
        variants
            .iter()
            .position(|v| v.size == size && color.is_none_or(|c| v.color == c))
            .or_else(|| (variants.len() == 1).then_some(0))
            .map(StockSlot::Variant)
    }

    /// Slot used when committing stock: the resolved size, or the legacy
    /// product-level stock when no size resolves and one is present.
    #[must_use]
    pub fn resolve_commit_slot(&self, size: &str, color: Option<&str>) -> Option<StockSlot> {
        self.resolve_size(size, color)
            .or_else(|| self.stock.map(|_| StockSlot::Product))
    }

    /// Current stock at `slot`. Out-of-range slots read as zero.
    #[must_use]
    pub fn stock_at(&self, slot: StockSlot) -> Stock {
        match slot {
            StockSlot::Size(i) => self
                .sizes
                .as_ref()
                .and_then(|s| s.get(i))
                .map(|s| s.stock),
            StockSlot::Variant(i) => self
                .variants
                .as_ref()
                .and_then(|v| v.get(i))
                .map(|v| v.stock),
            StockSlot::Product => self.stock,
        }
        .unwrap_or_default()
    }

    /// Display name of the size at `slot`, `"default"` when it has none.
    #[must_use]
    pub fn slot_label(&self, slot: StockSlot) -> &str {
        let label = match slot {
            StockSlot::Size(i) => self
                .sizes
                .as_ref()
                .and_then(|s| s.get(i))
                .map(|s| s.name.as_str()),
            StockSlot::Variant(i) => self
                .variants
                .as_ref()
                .and_then(|v| v.get(i))
                .map(|v| v.size.as_str()),
            StockSlot::Product => None,
        };
        label.filter(|l| !l.is_empty()).unwrap_or("default")
    }

    /// Take `quantity` from the stock at `slot`, flooring at zero.
    /// Returns the new stock level, or `None` if the slot does not exist.
    pub fn take_stock(&mut self, slot: StockSlot, quantity: Quantity) -> Option<Stock> {
        let stock = match slot {
            StockSlot::Size(i) => self
                .sizes
                .as_mut()
                .and_then(|s| s.get_mut(i))
                .map(|s| &mut s.stock),
            StockSlot::Variant(i) => self
                .variants
                .as_mut()
                .and_then(|v| v.get_mut(i))
                .map(|v| &mut v.stock),
            StockSlot::Product => self.stock.as_mut(),
        }?;
        *stock = stock.take(quantity);
        Some(*stock)
    }

    /// Every image path referenced by the product and its variants.
    pub fn all_images(&self) -> impl Iterator<Item = &str> {
        self.images.iter().map(String::as_str).chain(
            self.variants
                .iter()
                .flatten()
                .flat_map(|v| v.images.iter().map(String::as_str)),
        )
    }

    /// Whether the product belongs to `category` (loose text comparison).
    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        self.category.as_deref() == Some(category)
    }
}
