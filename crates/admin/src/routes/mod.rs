//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Liveness text
//! GET  /health                 - Health check
//! GET  /health/ready           - Data directory readable
//!
//! # Auth
//! POST /login                  - Exchange credentials for a bearer token
//!
//! # Products (writes require admin)
//! POST   /product              - Create (multipart)
//! GET    /products             - Full catalog
//! GET    /products/{category}  - Products in a category
//! GET    /product/{id}         - Product detail
//! PUT    /product/{id}         - Update (multipart)
//! DELETE /product/{id}         - Delete with images
//!
//! # Categories (writes require admin)
//! POST   /category
//! GET    /categories
//! GET    /category/{id}
//! PUT    /category/{id}
//! DELETE /category/{id}
//!
//! # Orders (all but POST /order require admin)
//! POST   /order                - Place an order (storefront checkout)
//! GET    /orders
//! GET    /order/{id}
//! PUT    /order/{id}
//! DELETE /order/{id}
//!
//! # Static
//! GET  /uploads/*              - Uploaded images
//! GET  /*                      - Public directory, else a 404 page
//! ```

pub mod auth;
pub mod categories;
pub mod orders;
pub mod products;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    handler::HandlerWithoutStateExt,
    http::{HeaderValue, Method, StatusCode, header},
    response::Html,
    routing::get,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::{Span, warn};

use crate::config::AdminConfig;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// All API routes, without layers.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(auth::router())
        .merge(products::router())
        .merge(categories::router())
        .merge(orders::router())
}

/// The complete application: routes, static files and middleware.
///
/// Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let config = state.config();
    let public = ServeDir::new(&config.storage.public_dir)
        .not_found_service(not_found.into_service());

    Router::new()
        .merge(routes())
        .nest_service("/uploads", ServeDir::new(&config.storage.uploads_dir))
        .fallback_service(public)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.body_limit_bytes))
        .layer(cors_layer(config))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// CORS for the configured storefront/admin origins, with credentials.
fn cors_layer(config: &AdminConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|_| warn!(%origin, "Ignoring invalid CORS origin"))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// GET /
async fn root() -> &'static str {
    "server working successfully."
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the data directory cannot be read.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match tokio::fs::read_dir(&state.config().storage.data_dir).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            warn!(error = %e, "Data directory not readable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

async fn not_found() -> (StatusCode, Html<&'static str>) {
    (StatusCode::NOT_FOUND, Html("<h1>404 NOT FOUND</h1>"))
}
