//! Order placement over HTTP: validation, stock commit and admin order
//! management.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::{Value, json};

use nb_collection_integration_tests::{TestServer, checkout};

fn panjabi_catalog() -> Value {
    json!([
        {
            "id": 1718000000001_i64,
            "name": "Cotton Panjabi",
            "price": "1800",
            "category": "7",
            "sizes": [{"name": "M", "stock": "5"}, {"name": "L", "stock": "1"}]
        },
        {
            "id": 1718000000002_i64,
            "name": "Jamdani Saree",
            "price": "4500",
            "variants": [
                {"size": "Free", "color": "Red", "stock": "2", "images": []},
                {"size": "Free", "color": "Blue", "stock": "4", "images": []}
            ]
        }
    ])
}

fn size_stock(product: &Value, size: &str) -> String {
    product["sizes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["name"] == size)
        .map(|s| s["stock"].as_str().unwrap().to_string())
        .unwrap()
}

// ============================================================================
// Placement
// ============================================================================

#[tokio::test]
async fn test_order_decrements_stock_then_rejects_oversell() {
    let server = TestServer::spawn().await;
    server.write_products(&panjabi_catalog());

    let order = checkout(json!([{"id": 1718000000001_i64, "quantity": 3, "size": "M"}]));
    let (status, created) = server.place_order(&order).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["id"].as_i64().is_some());
    assert_eq!(created["transactionId"], "8N7A6B5C4D");

    let (_, product) = server.get_json("/product/1718000000001", None).await;
    assert_eq!(size_stock(&product, "M"), "2");
    assert_eq!(size_stock(&product, "L"), "1");

    let before = server.products_file();
    let (status, body) = server.place_order(&order).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["errors"][0]["message"],
        "Product 'Cotton Panjabi' (size: 'M') only has 2 in stock (requested 3)."
    );
    assert_eq!(body["errors"][0]["field"], "products[0]");
    assert_eq!(server.products_file(), before);
}

#[tokio::test]
async fn test_variant_color_selects_stock() {
    let server = TestServer::spawn().await;
    server.write_products(&panjabi_catalog());

    let order = checkout(json!([
        {"id": "1718000000002", "quantity": "3", "size": "Free", "color": "Blue"}
    ]));
    let (status, _) = server.place_order(&order).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, product) = server.get_json("/product/1718000000002", None).await;
    assert_eq!(product["variants"][0]["stock"], "2");
    assert_eq!(product["variants"][1]["stock"], "1");
}

#[tokio::test]
async fn test_customer_errors_short_circuit_line_checks() {
    let server = TestServer::spawn().await;
    server.write_products(&panjabi_catalog());

    let mut order = checkout(json!([{"id": 42, "quantity": 1}]));
    order["phone"] = json!("+8801812345678");
    order["transactionId"] = json!("");

    let (status, body) = server.place_order(&order).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<_> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["phone", "transactionId"]);

    let (_, orders) = server
        .get_json("/orders", Some(&server.login().await))
        .await;
    assert_eq!(orders, json!([]));
}

#[tokio::test]
async fn test_whole_order_rejected_when_one_line_fails() {
    let server = TestServer::spawn().await;
    server.write_products(&panjabi_catalog());
    let before = server.products_file();

    let order = checkout(json!([
        {"id": 1718000000001_i64, "quantity": 1, "size": "M"},
        {"id": 1718000000001_i64, "quantity": 1, "size": "XXL"}
    ]));
    let (status, body) = server.place_order(&order).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"],
        json!([{
            "field": "products[1]",
            "message": "Size 'XXL' not found for product 'Cotton Panjabi'."
        }])
    );
    assert_eq!(server.products_file(), before);
}

#[tokio::test]
async fn test_concurrent_orders_never_oversell() {
    let server = TestServer::spawn().await;
    server.write_products(&panjabi_catalog());

    let order = checkout(json!([{"id": 1718000000001_i64, "quantity": 2, "size": "M"}]));
    let (a, b, c) = tokio::join!(
        server.place_order(&order),
        server.place_order(&order),
        server.place_order(&order)
    );

    let created = [a.0, b.0, c.0]
        .iter()
        .filter(|s| **s == StatusCode::CREATED)
        .count();
    assert_eq!(created, 2);

    let (_, product) = server.get_json("/product/1718000000001", None).await;
    assert_eq!(size_stock(&product, "M"), "1");

    let (_, orders) = server
        .get_json("/orders", Some(&server.login().await))
        .await;
    assert_eq!(orders.as_array().unwrap().len(), 2);
}

// ============================================================================
// Admin order management
// ============================================================================

#[tokio::test]
async fn test_order_routes_require_admin() {
    let server = TestServer::spawn().await;
    for path in ["/orders", "/order/1"] {
        let (status, body) = server.get_json(path, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{path}");
        assert_eq!(body["message"], "Unauthorized");
    }
}

#[tokio::test]
async fn test_admin_updates_and_deletes_order() {
    let server = TestServer::spawn().await;
    server.write_products(&panjabi_catalog());
    let token = server.login().await;

    let order = checkout(json!([{"id": 1718000000001_i64, "quantity": 1, "size": "L"}]));
    let (_, created) = server.place_order(&order).await;
    let id = created["id"].as_i64().unwrap();

    let (status, fetched) = server.get_json(&format!("/order/{id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let resp = server
        .client
        .put(server.url(&format!("/order/{id}")))
        .bearer_auth(&token)
        .json(&json!({"id": 1, "status": "shipped"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated, json!({"id": id, "status": "shipped"}));

    let resp = server
        .client
        .delete(server.url(&format!("/order/{id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let (status, body) = server.get_json(&format!("/order/{id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Order not found");
}
