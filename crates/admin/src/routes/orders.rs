//! Order route handlers.
//!
//! `POST /order` is the public checkout endpoint; everything else here is
//! admin-only.

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
use crate::models::OrderRecord;
use crate::state::AppState;

/// Build the order router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/order", post(place))
        .route("/orders", get(index))
        .route("/order/{id}", get(show).put(update).delete(destroy))
}

/// Treat anything but a JSON object as an empty body, which then fails
/// validation field by field.
fn into_object(body: Value) -> Map<String, Value> {
    match body {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Place an order from the storefront checkout.
///
/// POST /order
#[instrument(skip_all)]
async fn place(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<OrderRecord>)> {
    let order = state.orders().place(into_object(body)).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /orders
#[instrument(skip_all)]
async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<Vec<OrderRecord>>> {
    Ok(Json(state.orders().list().await?))
}

/// GET /order/{id}
#[instrument(skip(state, _admin))]
async fn show(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<String>,
) -> Result<Json<OrderRecord>> {
    state
        .orders()
        .get(&id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Order not found"))
}

/// Replace an order's body, keeping its id.
///
/// PUT /order/{id}
#[instrument(skip(state, _admin, body))]
async fn update(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<OrderRecord>> {
    state
        .orders()
        .replace(&id, into_object(body))
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Order not found"))
}

/// DELETE /order/{id}
#[instrument(skip(state, _admin))]
async fn destroy(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    if !state.orders().delete(&id).await? {
        return Err(AppError::NotFound("Order not found"));
    }
    Ok(Json(json!({"message": "Order deleted"})))
}
