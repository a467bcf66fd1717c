//! Unified error handling for admin.
//!
//! Every handler returns `Result<T, AppError>`. Server errors are captured
//! to Sentry before responding. Response bodies keep the shapes the admin
//! and storefront clients already parse:
//!
//! - `{"message": ...}` for not-found and login failures
//! - `{"error": ...}` for product writes
//! - `{"success": false, "errors": [...]}` / `{"success": false, "message": ...}`
//!   for order placement

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::{AuthError, CatalogError, PlaceOrderError};
use crate::store::StoreError;

/// Application-level error type for the admin API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Data file operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Login or bearer token check failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Order placement failed.
    #[error("Order error: {0}")]
    Order(#[from] PlaceOrderError),

    /// A product write failed. `context` is the client-facing message for
    /// server-side failures.
    #[error("{context}: {source}")]
    Product {
        context: &'static str,
        #[source]
        source: CatalogError,
    },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(&'static str),
}

impl AppError {
    /// Wrap a catalog error from a product write.
    #[must_use]
    pub const fn product(context: &'static str, source: CatalogError) -> Self {
        Self::Product { context, source }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) if err.is_internal() => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) if err.is_login_failure() => StatusCode::BAD_REQUEST,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Order(PlaceOrderError::Rejected(_)) => StatusCode::BAD_REQUEST,
            Self::Order(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Product { source, .. } => match source {
                CatalogError::NotFound => StatusCode::NOT_FOUND,
                CatalogError::InvalidField { .. } => StatusCode::BAD_REQUEST,
                CatalogError::Store(_) | CatalogError::Upload(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        // Don't expose internal error details to clients
        let body = match &self {
            Self::Store(_) => json!({"message": "Internal server error"}),
            Self::Auth(err) if err.is_internal() => json!({"message": "Internal server error"}),
            Self::Auth(err) if err.is_login_failure() => json!({"message": err.to_string()}),
            Self::Auth(_) => json!({"message": "Unauthorized"}),
            Self::Order(PlaceOrderError::Rejected(errors)) => {
                json!({"success": false, "errors": errors})
            }
            Self::Order(err) => json!({"success": false, "message": err.client_message()}),
            Self::Product { context, source } => match source {
                CatalogError::NotFound => json!({"error": "Product not found"}),
                CatalogError::InvalidField { .. } => json!({"error": source.to_string()}),
                CatalogError::Store(_) | CatalogError::Upload(_) => json!({"error": context}),
            },
            Self::NotFound(message) => json!({"message": message}),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
