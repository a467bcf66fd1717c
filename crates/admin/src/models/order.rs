//! Order submissions and stored order records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use nb_collection_core::{OrderId, Quantity, QuantityError};

use super::value_text;

/// An order as stored in `order.json`: a generated id plus the request body
/// exactly as the client sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(default, skip_serializing_if = "OrderId::is_missing")]
    pub id: OrderId,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl OrderRecord {
    /// Wrap a request body. A client-supplied `id` is dropped so the
    /// generated one is authoritative.
    #[must_use]
    pub fn new(id: OrderId, mut body: Map<String, Value>) -> Self {
        body.remove("id");
        Self { id, body }
    }
}

/// The fields of a checkout body the placement engine looks at.
///
/// Built leniently from arbitrary JSON: absent or non-scalar fields become
/// `None`, and numbers are read as their text form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderSubmission {
    pub phone: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub transaction_id: Option<String>,
    /// `None` when `products` is missing or not an array.
    pub products: Option<Vec<LineItem>>,
}

/// One requested product/size/quantity entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    /// The product id as text, `None` when the client sent none.
    pub product_id: Option<String>,
    pub quantity: Result<Quantity, QuantityError>,
    /// Requested size; an empty string selects the default size.
    pub size: String,
    pub color: Option<String>,
}

impl OrderSubmission {
    /// Extract the checkout fields from a request body.
    #[must_use]
    pub fn from_body(body: &Map<String, Value>) -> Self {
        let text = |key: &str| body.get(key).and_then(value_text);

        let products = match body.get("products") {
            Some(Value::Array(items)) => Some(items.iter().map(LineItem::from_value).collect()),
            _ => None,
        };

        Self {
            phone: text("phone"),
            name: text("name"),
            address: text("address"),
            city: text("city"),
            postal_code: text("postalCode"),
            transaction_id: text("transactionId"),
            products,
        }
    }
}

impl LineItem {
    fn from_value(value: &Value) -> Self {
        let field = |key: &str| value.as_object().and_then(|o| o.get(key));

        Self {
            product_id: field("id").and_then(value_text),
            quantity: Quantity::from_value(field("quantity")),
            size: field("size").and_then(value_text).unwrap_or_default(),
            color: field("color")
                .and_then(value_text)
                .filter(|c| !c.is_empty()),
        }
    }

    /// Product id for messages, `<missing>` when absent.
    #[must_use]
    pub fn product_id_label(&self) -> &str {
        self.product_id.as_deref().unwrap_or("<missing>")
    }
}
