//! Order placement and order administration.
//!
//! Placing an order runs in three phases:
//!
//! 1. Customer fields are validated with no I/O. Any failure rejects the
//!    order before line items are looked at.
//! 2. With the catalog locked, every line item is checked against the
//!    current catalog (product, quantity, size, stock).
//! 3. The order file is locked and read. If it cannot be read, nothing is
//!    written. Still under both locks, the catalog is re-read, stock is
//!    decremented and the catalog is written back. If that write fails the
//!    pre-commit snapshot is written back and no order is created.
//!    Otherwise the order (generated id plus the request body as sent) is
//!    appended to the order file.
//!
//! A failure to write the order file after stock was committed is reported
//! but not undone. Locks are always taken catalog first, then orders.

mod error;
mod validation;

pub use error::PlaceOrderError;
pub use validation::{CheckedLine, FieldError, validate_customer, validate_line_items};

use serde_json::{Map, Value};
use tracing::{debug, error, info, instrument, warn};

use nb_collection_core::OrderId;

use crate::models::{LineItem, OrderRecord, OrderSubmission, Product};
use crate::store::{SharedStore, StoreError, StoreGuard};

/// Places and manages orders.
pub struct OrderService<'a> {
    catalog: &'a SharedStore<Product>,
    orders: &'a SharedStore<OrderRecord>,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub const fn new(catalog: &'a SharedStore<Product>, orders: &'a SharedStore<OrderRecord>) -> Self {
        Self { catalog, orders }
    }

    /// Validate a checkout body, commit its stock and save the order.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceOrderError::Rejected`] with every validation failure,
    /// or one of the persistence variants when a store operation fails.
    #[instrument(skip_all)]
    pub async fn place(&self, body: Map<String, Value>) -> Result<OrderRecord, PlaceOrderError> {
        let submission = OrderSubmission::from_body(&body);

        let errors = validate_customer(&submission);
        if !errors.is_empty() {
            warn!(errors = errors.len(), "Order rejected: invalid customer fields");
            return Err(PlaceOrderError::Rejected(errors));
        }

        let catalog = self.catalog.lock().await;
        let snapshot = catalog
            .read()
            .await
            .map_err(PlaceOrderError::CatalogUnavailable)?;
        let items = submission.products.as_deref();

        let lines = match validate_line_items(items, &snapshot) {
            Ok(lines) => lines,
            Err(errors) => {
                warn!(errors = errors.len(), "Order rejected: invalid line items");
                return Err(PlaceOrderError::Rejected(errors));
            }
        };

        let orders = self.orders.lock().await;
        let mut records = orders.read().await.map_err(|e| {
            error!(error = %e, "Order file unreadable, order refused before stock commit");
            PlaceOrderError::OrderWrite(e)
        })?;

        commit_stock(&catalog, items.unwrap_or_default(), &lines).await?;
        drop(catalog);

        let record = OrderRecord::new(OrderId::generate(records.iter().map(|o| &o.id)), body);
        records.push(record.clone());
        orders.write(&records).await.map_err(|e| {
            error!(error = %e, "Stock committed but order could not be saved");
            PlaceOrderError::OrderWrite(e)
        })?;
        drop(orders);

        info!(
            order_id = %record.id,
            lines = lines.len(),
            units = lines.iter().map(|l| l.quantity.get()).sum::<u64>(),
            "Order placed"
        );
        Ok(record)
    }

    /// All stored orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the order file cannot be read.
    pub async fn list(&self) -> Result<Vec<OrderRecord>, StoreError> {
        self.orders.read().await
    }

    /// The order whose id matches `id` as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the order file cannot be read.
    pub async fn get(&self, id: &str) -> Result<Option<OrderRecord>, StoreError> {
        Ok(self.orders.read().await?.into_iter().find(|o| o.id.matches(id)))
    }

    /// Replace an order's body. The stored id is kept; no validation or
    /// stock adjustment is done.
    ///
    /// # Errors
    ///
    /// Returns an error if the order file cannot be read or written.
    #[instrument(skip(self, body))]
    pub async fn replace(
        &self,
        id: &str,
        body: Map<String, Value>,
    ) -> Result<Option<OrderRecord>, StoreError> {
        let orders = self.orders.lock().await;
        let mut records = orders.read().await?;
        let Some(slot) = records.iter_mut().find(|o| o.id.matches(id)) else {
            return Ok(None);
        };

        *slot = OrderRecord::new(slot.id.clone(), body);
        let updated = slot.clone();
        orders.write(&records).await?;

        info!(order_id = %updated.id, "Order updated");
        Ok(Some(updated))
    }

    /// Delete an order. Returns `false` when no order matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the order file cannot be read or written.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let orders = self.orders.lock().await;
        let mut records = orders.read().await?;
        let before = records.len();
        records.retain(|o| !o.id.matches(id));
        if records.len() == before {
            return Ok(false);
        }

        orders.write(&records).await?;
        info!("Order deleted");
        Ok(true)
    }
}

/// Decrement stock for `items` on a fresh copy of the catalog and write it,
/// restoring the snapshot if the write fails.
async fn commit_stock(
    catalog: &StoreGuard<'_, Product>,
    items: &[LineItem],
    lines: &[CheckedLine],
) -> Result<(), PlaceOrderError> {
    let mut products = catalog
        .read()
        .await
        .map_err(PlaceOrderError::CatalogUnavailable)?;
    let snapshot = products.clone();

    apply_line_items(&mut products, items, lines);

    if let Err(e) = catalog.write(&products).await {
        error!(error = %e, "Stock commit failed, restoring catalog");
        if let Err(rollback) = catalog.write(&snapshot).await {
            error!(error = %rollback, "CRITICAL: catalog rollback failed after stock commit error");
        }
        return Err(PlaceOrderError::StockCommit(e));
    }

    Ok(())
}

/// Take each checked line's quantity from its stock slot, flooring at zero.
///
/// The slot is resolved again on the fresh catalog, which wins over the
/// validated one. Lines whose product or size no longer resolves are skipped.
fn apply_line_items(products: &mut [Product], items: &[LineItem], lines: &[CheckedLine]) {
    for (item, line) in items.iter().zip(lines) {
        let Some(product) = products.iter_mut().find(|p| validation::refers_to(p, item)) else {
            warn!(product_id = %item.product_id_label(), "Product missing at commit, line skipped");
            continue;
        };

        let Some(slot) = product.resolve_commit_slot(&item.size, item.color.as_deref()) else {
            warn!(product_id = %product.id, size = %item.size, "No stock field to decrement");
            continue;
        };
        if slot != line.slot {
            warn!(
                product_id = %product.id,
                size = %item.size,
                validated = ?line.slot,
                committed = ?slot,
                "Stock slot changed since validation"
            );
        }

        if let Some(left) = product.take_stock(slot, line.quantity) {
            debug!(product_id = %product.id, size = %item.size, %left, "Stock decremented");
        }
    }
}
