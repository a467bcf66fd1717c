//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AdminConfig;
use crate::models::{Category, OrderRecord, Product};
use crate::services::{
    CatalogService, CategoryService, OrderService, TokenSigner, UploadStore,
};
use crate::store::{JsonFileStore, SharedStore, Store};

/// Backing stores for the three data files.
pub struct Stores {
    pub products: Arc<dyn Store<Product>>,
    pub categories: Arc<dyn Store<Category>>,
    pub orders: Arc<dyn Store<OrderRecord>>,
}

impl Stores {
    /// JSON files in the configured data directory.
    #[must_use]
    pub fn json_files(config: &AdminConfig) -> Self {
        Self {
            products: Arc::new(JsonFileStore::new(config.storage.products_path())),
            categories: Arc::new(JsonFileStore::new(config.storage.categories_path())),
            orders: Arc::new(JsonFileStore::new(config.storage.orders_path())),
        }
    }
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    products: SharedStore<Product>,
    categories: SharedStore<Category>,
    orders: SharedStore<OrderRecord>,
    uploads: UploadStore,
    tokens: TokenSigner,
}

impl AppState {
    /// Create state backed by the JSON files named in `config`.
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        let stores = Stores::json_files(&config);
        Self::with_stores(config, stores)
    }

    /// Create state with explicit stores.
    #[must_use]
    pub fn with_stores(config: AdminConfig, stores: Stores) -> Self {
        let uploads = UploadStore::new(config.storage.uploads_dir.clone());
        let tokens = TokenSigner::from_config(&config.auth);

        Self {
            inner: Arc::new(AppStateInner {
                products: SharedStore::new(stores.products),
                categories: SharedStore::new(stores.categories),
                orders: SharedStore::new(stores.orders),
                uploads,
                tokens,
                config,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenSigner {
        &self.inner.tokens
    }

    #[must_use]
    pub fn uploads(&self) -> &UploadStore {
        &self.inner.uploads
    }

    #[must_use]
    pub fn catalog(&self) -> CatalogService<'_> {
        CatalogService::new(&self.inner.products, &self.inner.uploads)
    }

    #[must_use]
    pub fn categories(&self) -> CategoryService<'_> {
        CategoryService::new(&self.inner.categories)
    }

    #[must_use]
    pub fn orders(&self) -> OrderService<'_> {
        OrderService::new(&self.inner.products, &self.inner.orders)
    }
}
