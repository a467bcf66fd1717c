//! Catalog, categories, uploads and admin login over HTTP.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};

use nb_collection_integration_tests::{ADMIN_PASSWORD, ADMIN_USERNAME, TestServer, json_response};

fn product_form() -> Form {
    Form::new()
        .text("name", "Muslin Kurti")
        .text("price", "2250")
        .text("description", "Hand-embroidered")
        .text("category", "11")
        .text("sizes", r#"[{"name": "S", "stock": "4"}, {"name": "M", "stock": "2"}]"#)
        .part(
            "images",
            Part::bytes(b"front-image".to_vec()).file_name("front view.jpg"),
        )
}

async fn create_product(server: &TestServer, token: &str, form: Form) -> (StatusCode, Value) {
    let resp = server
        .client
        .post(server.url("/product"))
        .bearer_auth(token)
        .multipart(form)
        .send()
        .await
        .unwrap();
    json_response(resp).await
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_failures() {
    let server = TestServer::spawn().await;
    let cases = [
        (json!({"password": ADMIN_PASSWORD}), "Username required."),
        (json!({"username": ADMIN_USERNAME}), "Password required."),
        (
            json!({"username": ADMIN_USERNAME, "password": "wrong"}),
            "Invalid credentials.",
        ),
    ];

    for (body, message) in cases {
        let resp = server
            .client
            .post(server.url("/login"))
            .json(&body)
            .send()
            .await
            .unwrap();
        let (status, body) = json_response(resp).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], message);
    }
}

#[tokio::test]
async fn test_forged_token_is_rejected() {
    let server = TestServer::spawn().await;
    let token = server.login().await;
    let forged = format!("{}0", token.trim_end_matches(|c: char| c.is_ascii_hexdigit()));

    let (status, _) = server.get_json("/orders", Some(&forged)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = server.get_json("/orders", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
async fn test_create_product_with_upload() {
    let server = TestServer::spawn().await;
    let token = server.login().await;

    let (status, body) = create_product(&server, &token, product_form()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product added successfully");

    let product = &body["product"];
    assert_eq!(product["name"], "Muslin Kurti");
    assert_eq!(product["sizes"][1], json!({"name": "M", "stock": "2"}));

    let image = product["images"][0].as_str().unwrap();
    assert!(image.starts_with("/uploads/"));
    assert!(image.ends_with("-front_view.jpg"));

    let resp = server.client.get(server.url(image)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.bytes().await.unwrap().as_ref(), b"front-image");

    let (_, listed) = server.get_json("/products/11", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    let (_, other) = server.get_json("/products/12", None).await;
    assert_eq!(other, json!([]));
}

#[tokio::test]
async fn test_product_writes_require_admin() {
    let server = TestServer::spawn().await;
    let resp = server
        .client
        .post(server.url("/product"))
        .multipart(product_form())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let (_, products) = server.get_json("/products", None).await;
    assert_eq!(products, json!([]));
}

#[tokio::test]
async fn test_invalid_sizes_json_is_rejected() {
    let server = TestServer::spawn().await;
    let token = server.login().await;
    let form = Form::new().text("name", "Broken").text("sizes", "[{");

    let (status, body) = create_product(&server, &token, form).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("invalid sizes"));
    assert_eq!(server.products_file(), "");
}

#[tokio::test]
async fn test_update_keeps_listed_images_and_appends_uploads() {
    let server = TestServer::spawn().await;
    let token = server.login().await;
    let (_, created) = create_product(&server, &token, product_form()).await;
    let id = created["product"]["id"].as_i64().unwrap();
    let kept = created["product"]["images"][0].as_str().unwrap().to_string();

    let form = Form::new()
        .text("name", "Muslin Kurti (Eid)")
        .text("price", "2400")
        .text("sizes", r#"[{"name": "S", "stock": "9"}]"#)
        .text("images", kept.clone())
        .part("images", Part::bytes(b"back".to_vec()).file_name("back.jpg"));

    let resp = server
        .client
        .put(server.url(&format!("/product/{id}")))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .unwrap();
    let (status, body) = json_response(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product updated successfully");

    let images = body["product"]["images"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0], kept);
    assert!(images[1].as_str().unwrap().ends_with("-back.jpg"));
    assert_eq!(body["product"]["sizes"], json!([{"name": "S", "stock": "9"}]));
}

#[tokio::test]
async fn test_delete_product_removes_images() {
    let server = TestServer::spawn().await;
    let token = server.login().await;
    let (_, created) = create_product(&server, &token, product_form()).await;
    let id = created["product"]["id"].as_i64().unwrap();
    let image = created["product"]["images"][0].as_str().unwrap();
    let file_name = image.trim_start_matches("/uploads/");
    let on_disk = server.state.config().storage.uploads_dir.join(file_name);
    assert!(on_disk.exists());

    let resp = server
        .client
        .delete(server.url(&format!("/product/{id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let (status, body) = json_response(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product deleted successfully");
    assert!(!on_disk.exists());

    let (status, body) = server.get_json(&format!("/product/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
}

// ============================================================================
// Categories
// ============================================================================

#[tokio::test]
async fn test_category_lifecycle() {
    let server = TestServer::spawn().await;
    let token = server.login().await;

    let resp = server
        .client
        .post(server.url("/category"))
        .bearer_auth(&token)
        .json(&json!({"name": "Sarees", "slug": "sarees"}))
        .send()
        .await
        .unwrap();
    let (status, created) = json_response(resp).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let resp = server
        .client
        .put(server.url(&format!("/category/{id}")))
        .bearer_auth(&token)
        .json(&json!({"name": "Silk Sarees"}))
        .send()
        .await
        .unwrap();
    let (_, updated) = json_response(resp).await;
    assert_eq!(updated, json!({"id": id, "name": "Silk Sarees", "slug": "sarees"}));

    let (_, all) = server.get_json("/categories", None).await;
    assert_eq!(all, json!([updated]));

    let resp = server
        .client
        .delete(server.url(&format!("/category/{id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let (_, body) = json_response(resp).await;
    assert_eq!(body["message"], "Category deleted");

    let (status, body) = server.get_json(&format!("/category/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Category not found");
}

// ============================================================================
// Misc
// ============================================================================

#[tokio::test]
async fn test_unknown_path_serves_not_found_page() {
    let server = TestServer::spawn().await;
    let resp = server
        .client
        .get(server.url("/no/such/page"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(resp.text().await.unwrap(), "<h1>404 NOT FOUND</h1>");

    std::fs::write(
        server.root().join("public").join("index.html"),
        "<p>shop</p>",
    )
    .unwrap();
    let resp = server.client.get(server.url("/index.html")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "<p>shop</p>");
}
