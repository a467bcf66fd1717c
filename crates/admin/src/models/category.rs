//! Category records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use nb_collection_core::CategoryId;

/// A category as stored in `category.json`.
///
/// Apart from the id, categories are free-form: whatever fields the admin
/// UI sends (name, slug, image...) are stored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, skip_serializing_if = "CategoryId::is_missing")]
    pub id: CategoryId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Category {
    /// Build a category from a request body. Any `id` in the body is ignored.
    #[must_use]
    pub fn new(id: CategoryId, mut fields: Map<String, Value>) -> Self {
        fields.remove("id");
        Self { id, fields }
    }

    /// Shallow-merge `patch` into the stored fields. The id never changes.
    pub fn merge(&mut self, patch: Map<String, Value>) {
        for (key, value) in patch {
            if key != "id" {
                self.fields.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_new_ignores_body_id() {
        let c = Category::new(CategoryId::new(5), object(json!({"id": 1, "name": "Saree"})));
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json, json!({"id": 5, "name": "Saree"}));
    }

    #[test]
    fn test_merge_is_shallow_and_keeps_id() {
        let mut c = Category::new(
            CategoryId::new(5),
            object(json!({"name": "Saree", "slug": "saree"})),
        );
        c.merge(object(json!({"id": 99, "name": "Sarees"})));
        assert_eq!(c.id, CategoryId::new(5));
        assert_eq!(
            serde_json::to_value(&c).unwrap(),
            json!({"id": 5, "name": "Sarees", "slug": "saree"})
        );
    }

    #[test]
    fn test_string_and_missing_ids_are_readable() {
        let categories: Vec<Category> =
            serde_json::from_value(json!([{"id": "kurti", "name": "Kurti"}, {"name": "Saree"}]))
                .unwrap();
        assert!(categories[0].id.matches("kurti"));
        assert!(categories[1].id.is_missing());
    }
}
