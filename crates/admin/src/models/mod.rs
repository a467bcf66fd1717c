//! Domain models for admin.
//!
//! Records mirror the JSON documents in the data directory. Fields the
//! backend does not interpret are kept in a flattened `extra` map so that
//! rewriting a file never drops data written by other tools.

pub mod category;
pub mod order;
pub mod product;
pub mod session;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub use category::Category;
pub use order::{LineItem, OrderRecord, OrderSubmission};
pub use product::{ColorVariant, Product, SizeVariant, StockSlot};
pub use session::{CurrentAdmin, TokenClaims};

/// Render a loosely typed JSON scalar as text.
///
/// Strings are returned as-is and numbers/booleans in their JSON form;
/// `null`, arrays and objects have no text form.
#[must_use]
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Deserialize a field that older data files store as either a string or a
/// number (category ids, size names) into a `String`.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_text).unwrap_or_default())
}

/// Like [`lenient_string`] but keeps absence distinguishable.
pub(crate) fn lenient_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_text))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!("M")), Some("M".to_string()));
        assert_eq!(value_text(&json!(42)), Some("42".to_string()));
        assert_eq!(value_text(&json!(true)), Some("true".to_string()));
        assert_eq!(value_text(&json!(null)), None);
        assert_eq!(value_text(&json!(["a"])), None);
    }
}
