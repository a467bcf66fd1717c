//! Category route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde_json::{Map, Value, json};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::Category;
use crate::state::AppState;

/// Build the category router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/category", post(create))
        .route("/categories", get(index))
        .route("/category/{id}", get(show).put(update).delete(destroy))
}

/// GET /categories
#[instrument(skip(state))]
async fn index(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.categories().list().await?))
}

/// GET /category/{id}
#[instrument(skip(state))]
async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Category>> {
    state
        .categories()
        .get(&id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Category not found"))
}

/// POST /category
#[instrument(skip_all)]
async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Json(fields): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<Category>)> {
    let category = state.categories().create(fields).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /category/{id}
#[instrument(skip(state, _admin, patch))]
async fn update(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<String>,
    Json(patch): Json<Map<String, Value>>,
) -> Result<Json<Category>> {
    state
        .categories()
        .update(&id, patch)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Category not found"))
}

/// DELETE /category/{id}
#[instrument(skip(state, _admin))]
async fn destroy(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    if !state.categories().delete(&id).await? {
        return Err(AppError::NotFound("Category not found"));
    }
    Ok(Json(json!({"message": "Category deleted"})))
}
