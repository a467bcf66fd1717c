//! Checkout validation.
//!
//! Customer fields are checked first and on their own; line items are only
//! looked at once every customer field passes.

use serde::Serialize;

use nb_collection_core::{Phone, PhoneError, PostalCode, Quantity};

use crate::models::{LineItem, OrderSubmission, Product, StockSlot};

/// One validation failure, returned to the client verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A line item that passed validation against a catalog snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckedLine {
    pub slot: StockSlot,
    pub quantity: Quantity,
}

fn long_enough(value: Option<&str>, min_chars: usize) -> bool {
    value.is_some_and(|v| v.trim().chars().count() >= min_chars)
}

/// Check the customer and payment fields. Every field is checked; all
/// failures are returned together.
#[must_use]
pub fn validate_customer(order: &OrderSubmission) -> Vec<FieldError> {
    let mut errors = Vec::new();

    match Phone::parse(order.phone.as_deref().unwrap_or_default()) {
        Ok(_) => {}
        Err(PhoneError::Empty) => {
            errors.push(FieldError::new("phone", "Phone number is required."));
        }
        Err(PhoneError::InvalidFormat) => {
            errors.push(FieldError::new("phone", "Invalid Bangladeshi phone number."));
        }
    }

    if !long_enough(order.name.as_deref(), 2) {
        errors.push(FieldError::new(
            "firstName",
            "First name must be at least 2 characters long.",
        ));
    }

    if !long_enough(order.address.as_deref(), 5) {
        errors.push(FieldError::new(
            "address",
            "Address must be at least 5 characters long.",
        ));
    }

    if !long_enough(order.city.as_deref(), 2) {
        errors.push(FieldError::new("city", "City is required."));
    }

    if let Some(postal_code) = order.postal_code.as_deref().filter(|p| !p.is_empty())
        && PostalCode::parse(postal_code).is_err()
    {
        errors.push(FieldError::new(
            "postalCode",
            "Postal code must be 4\u{2013}6 digits.",
        ));
    }

    // Required for every payment method, cash on delivery included.
    if order.transaction_id.as_deref().is_none_or(str::is_empty) {
        errors.push(FieldError::new(
            "transactionId",
            "Transaction ID is required for online payments.",
        ));
    }

    errors
}

/// Check every line item against `catalog` without modifying it.
///
/// Each item reports at most one error: unknown product, then invalid
/// quantity, then unknown size, then insufficient stock.
///
/// # Errors
///
/// Returns every failure when any line item is invalid, or a single
/// `products` error when there are no line items at all.
pub fn validate_line_items(
    items: Option<&[LineItem]>,
    catalog: &[Product],
) -> Result<Vec<CheckedLine>, Vec<FieldError>> {
    let Some(items) = items.filter(|items| !items.is_empty()) else {
        return Err(vec![FieldError::new(
            "products",
            "At least one product must be included.",
        )]);
    };

    let mut checked = Vec::with_capacity(items.len());
    let mut errors = Vec::new();

    for (index, item) in items.iter().enumerate() {
        match check_line(item, catalog) {
            Ok(line) => checked.push(line),
            Err(message) => errors.push(FieldError::new(format!("products[{index}]"), message)),
        }
    }

    if errors.is_empty() {
        Ok(checked)
    } else {
        Err(errors)
    }
}

fn check_line(item: &LineItem, catalog: &[Product]) -> Result<CheckedLine, String> {
    let product = catalog
        .iter()
        .find(|p| refers_to(p, item))
        .ok_or_else(|| format!("Product with ID {} not found.", item.product_id_label()))?;

    let quantity = item
        .quantity
        .map_err(|_| format!("Invalid quantity for '{}'.", product.name))?;

    let slot = product
        .resolve_size(&item.size, item.color.as_deref())
        .ok_or_else(|| {
            format!(
                "Size '{}' not found for product '{}'.",
                item.size, product.name
            )
        })?;

    let stock = product.stock_at(slot);
    if !stock.covers(quantity) {
        return Err(format!(
            "Product '{}' (size: '{}') only has {} in stock (requested {}).",
            product.name,
            product.slot_label(slot),
            stock,
            quantity
        ));
    }

    Ok(CheckedLine { slot, quantity })
}

/// Whether `item` refers to `product`, comparing ids as text.
pub(super) fn refers_to(product: &Product, item: &LineItem) -> bool {
    item.product_id
        .as_deref()
        .is_some_and(|id| product.id.matches(id))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn submission(value: Value) -> OrderSubmission {
        match value {
            Value::Object(map) => OrderSubmission::from_body(&map),
            _ => panic!("expected object"),
        }
    }

    fn valid_customer() -> Value {
        json!({
            "phone": "01712345678",
            "name": "Rahima",
            "address": "House 12, Road 4",
            "city": "Dhaka",
            "transactionId": "TX1"
        })
    }

    fn catalog() -> Vec<Product> {
        serde_json::from_value(json!([
            {"id": 1, "name": "Silk Saree", "sizes": [{"name": "", "stock": "3"}]},
            {"id": 2, "name": "Panjabi", "sizes": [
                {"name": "M", "stock": "5"},
                {"name": "L", "stock": "0"}
            ]},
            {"id": 3, "name": "Scarf", "stock": "9"}
        ]))
        .unwrap()
    }

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_valid_customer_passes() {
        assert!(validate_customer(&submission(valid_customer())).is_empty());
    }

    #[test]
    fn test_empty_body_reports_every_required_field() {
        let errors = validate_customer(&submission(json!({})));
        assert_eq!(
            fields(&errors),
            vec!["phone", "firstName", "address", "city", "transactionId"]
        );
        assert_eq!(errors[0].message, "Phone number is required.");
    }

    #[test]
    fn test_phone_rules() {
        for bad in ["0171234567", "01212345678", "8801712345678", "01712-45678", " 01712345678"] {
            let mut body = valid_customer();
            body["phone"] = json!(bad);
            let errors = validate_customer(&submission(body));
            assert_eq!(
                errors,
                vec![FieldError::new("phone", "Invalid Bangladeshi phone number.")],
                "{bad}"
            );
        }
    }

    #[test]
    fn test_lengths_are_measured_after_trimming() {
        let mut body = valid_customer();
        body["name"] = json!("  A  ");
        body["address"] = json!(" Road ");
        body["city"] = json!("Ctg");
        let errors = validate_customer(&submission(body));
        assert_eq!(fields(&errors), vec!["firstName", "address"]);
    }

    #[test]
    fn test_postal_code_is_optional_but_checked() {
        let mut body = valid_customer();
        body["postalCode"] = json!("");
        assert!(validate_customer(&submission(body.clone())).is_empty());

        body["postalCode"] = json!(1207);
        assert!(validate_customer(&submission(body.clone())).is_empty());

        body["postalCode"] = json!("12a4");
        let errors = validate_customer(&submission(body));
        assert_eq!(fields(&errors), vec!["postalCode"]);
        assert_eq!(errors[0].message, "Postal code must be 4–6 digits.");
    }

    #[test]
    fn test_transaction_id_required_for_cash_too() {
        let mut body = valid_customer();
        body["paymentMethod"] = json!("Cash on delivery");
        body["transactionId"] = json!("");
        let errors = validate_customer(&submission(body));
        assert_eq!(fields(&errors), vec!["transactionId"]);
    }

    #[test]
    fn test_missing_products() {
        let sub = submission(json!({"products": []}));
        let errors = validate_line_items(sub.products.as_deref(), &catalog()).unwrap_err();
        assert_eq!(
            errors,
            vec![FieldError::new("products", "At least one product must be included.")]
        );

        let sub = submission(json!({}));
        assert!(validate_line_items(sub.products.as_deref(), &catalog()).is_err());
    }

    #[test]
    fn test_line_errors_accumulate_one_per_item() {
        let sub = submission(json!({"products": [
            {"id": 99, "quantity": 1},
            {"id": 2, "quantity": 0, "size": "M"},
            {"id": 2, "quantity": 1, "size": "XL"},
            {"id": 2, "quantity": 1, "size": "L"},
            {"id": "2", "quantity": "2", "size": "M"}
        ]}));
        let errors = validate_line_items(sub.products.as_deref(), &catalog()).unwrap_err();
        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Product with ID 99 not found.",
                "Invalid quantity for 'Panjabi'.",
                "Size 'XL' not found for product 'Panjabi'.",
                "Product 'Panjabi' (size: 'L') only has 0 in stock (requested 1).",
            ]
        );
        assert_eq!(fields(&errors), vec!["products[0]", "products[1]", "products[2]", "products[3]"]);
    }

    #[test]
    fn test_single_unnamed_size_is_the_default() {
        let sub = submission(json!({"products": [{"id": 1, "quantity": 2}]}));
        let lines = validate_line_items(sub.products.as_deref(), &catalog()).unwrap();
        assert_eq!(lines[0].slot, StockSlot::Size(0));
        assert_eq!(lines[0].quantity.get(), 2);

        let sub = submission(json!({"products": [{"id": 1, "quantity": 4, "size": ""}]}));
        let errors = validate_line_items(sub.products.as_deref(), &catalog()).unwrap_err();
        assert_eq!(
            errors[0].message,
            "Product 'Silk Saree' (size: 'default') only has 3 in stock (requested 4)."
        );
    }

    #[test]
    fn test_product_without_sizes_is_rejected_at_validation() {
        let sub = submission(json!({"products": [{"id": 3, "quantity": 1}]}));
        let errors = validate_line_items(sub.products.as_deref(), &catalog()).unwrap_err();
        assert_eq!(errors[0].message, "Size '' not found for product 'Scarf'.");
    }
}
