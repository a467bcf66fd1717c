//! Product catalog route handlers.
//!
//! Reads are public (the storefront lists products from here); writes
//! require an admin token and take multipart forms.

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::Product;
use crate::services::{CatalogError, ProductForm, UploadedFile};
use crate::state::AppState;

/// Build the product router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/product", post(create))
        .route("/products", get(index))
        .route("/products/{category}", get(by_category))
        .route("/product/{id}", get(show).put(update).delete(destroy))
}

#[derive(Debug, Serialize)]
struct ProductResponse {
    message: &'static str,
    product: Product,
}

/// Collect a multipart product form. Any part with a file name is an
/// upload; `images`/`images[]` text parts are kept image paths.
async fn read_form(mut multipart: Multipart) -> std::result::Result<ProductForm, CatalogError> {
    let invalid = |e: axum::extract::multipart::MultipartError| CatalogError::InvalidField {
        field: "form",
        reason: e.body_text(),
    };

    let mut form = ProductForm::default();
    while let Some(field) = multipart.next_field().await.map_err(invalid)? {
        let name = field.name().unwrap_or_default().to_string();

        if let Some(file_name) = field.file_name().map(str::to_string) {
            let bytes = field.bytes().await.map_err(invalid)?;
            if !bytes.is_empty() {
                form.files.push(UploadedFile {
                    field: name,
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let text = field.text().await.map_err(invalid)?;
        match name.as_str() {
            "name" => form.name = Some(text),
            "price" => form.price = Some(text),
            "description" => form.description = Some(text),
            "category" => form.category = Some(text),
            "sizes" => form.sizes = Some(text),
            "variants" => form.variants = Some(text),
            "images" | "images[]" => form.images.push(text),
            _ => {}
        }
    }
    Ok(form)
}

/// List the whole catalog.
///
/// GET /products
#[instrument(skip(state))]
async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.catalog().list().await?))
}

/// Products in one category.
///
/// GET /products/{category}
#[instrument(skip(state))]
async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.catalog().by_category(&category).await?))
}

/// GET /product/{id}
#[instrument(skip(state))]
async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    state
        .catalog()
        .get(&id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Product not found"))
}

/// POST /product
#[instrument(skip_all)]
async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    multipart: Multipart,
) -> Result<Json<ProductResponse>> {
    const CONTEXT: &str = "Failed to add product";

    let form = read_form(multipart)
        .await
        .map_err(|e| AppError::product(CONTEXT, e))?;
    let product = state
        .catalog()
        .create(form)
        .await
        .map_err(|e| AppError::product(CONTEXT, e))?;

    Ok(Json(ProductResponse {
        message: "Product added successfully",
        product,
    }))
}

/// PUT /product/{id}
#[instrument(skip(state, _admin, multipart))]
async fn update(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<ProductResponse>> {
    const CONTEXT: &str = "Failed to update product";

    let form = read_form(multipart)
        .await
        .map_err(|e| AppError::product(CONTEXT, e))?;
    let product = state
        .catalog()
        .update(&id, form)
        .await
        .map_err(|e| AppError::product(CONTEXT, e))?;

    Ok(Json(ProductResponse {
        message: "Product updated successfully",
        product,
    }))
}

/// DELETE /product/{id}
#[instrument(skip(state, _admin))]
async fn destroy(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    state
        .catalog()
        .delete(&id)
        .await?
        .ok_or(AppError::NotFound("Product not found"))?;

    Ok(Json(json!({"message": "Product deleted successfully"})))
}
