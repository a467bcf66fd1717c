//! NB Collection admin server.
//!
//! Serves the product/category/order API, uploaded images and the public
//! directory on `ADMIN_HOST:ADMIN_PORT` (default 127.0.0.1:8080).
//!
//! # Architecture
//!
//! - Axum web framework
//! - JSON array files as storage (`ADMIN_DATA_DIR`)
//! - Shared-credential login with HMAC-signed bearer tokens
//! - Optional Sentry error tracking

#![cfg_attr(not(test), forbid(unsafe_code))]

use nb_collection_admin::config::AdminConfig;
use nb_collection_admin::state::AppState;
use nb_collection_admin::store::JsonFileStore;
use nb_collection_admin::models::{Category, OrderRecord, Product};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &AdminConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            // Order bodies carry customer names, phones and addresses
            send_default_pii: false,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Create the data files and uploads directory if they are missing.
async fn prepare_storage(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let storage = &state.config().storage;
    JsonFileStore::<Product>::new(storage.products_path())
        .ensure_exists()
        .await?;
    JsonFileStore::<Category>::new(storage.categories_path())
        .ensure_exists()
        .await?;
    JsonFileStore::<OrderRecord>::new(storage.orders_path())
        .ensure_exists()
        .await?;
    state.uploads().ensure_dir().await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = AdminConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "nb_collection_admin=info,tower_http=debug".into());

    // LOG_FORMAT=json for structured log parsing, text format otherwise
    let json_layer = config
        .log_json
        .then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!config.log_json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let addr = config.socket_addr();
    let state = AppState::new(config);

    prepare_storage(&state)
        .await
        .expect("Failed to prepare data directory");
    tracing::info!(
        data_dir = %state.config().storage.data_dir.display(),
        uploads_dir = %state.config().storage.uploads_dir.display(),
        "Storage ready"
    );

    let app = nb_collection_admin::app(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    tracing::info!("admin listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
