//! Create the data directory layout the server expects.

use tracing::info;

use nb_collection_admin::config::StorageConfig;
use nb_collection_admin::models::{Category, OrderRecord, Product};
use nb_collection_admin::services::UploadStore;
use nb_collection_admin::store::{JsonFileStore, StoreError};

/// Create `products.json`, `category.json` and `order.json` holding `[]`
/// where missing, plus the uploads directory. Existing files are untouched.
///
/// # Errors
///
/// Returns an error if a directory or file cannot be created.
pub async fn run(storage: &StorageConfig) -> Result<(), Box<dyn std::error::Error>> {
    report(JsonFileStore::<Product>::new(storage.products_path())).await?;
    report(JsonFileStore::<Category>::new(storage.categories_path())).await?;
    report(JsonFileStore::<OrderRecord>::new(storage.orders_path())).await?;

    UploadStore::new(storage.uploads_dir.clone()).ensure_dir().await?;
    info!(path = %storage.uploads_dir.display(), "Uploads directory ready");
    Ok(())
}

async fn report<T>(store: JsonFileStore<T>) -> Result<(), StoreError> {
    if store.ensure_exists().await? {
        info!(path = %store.path().display(), "Created");
    } else {
        info!(path = %store.path().display(), "Already exists");
    }
    Ok(())
}
