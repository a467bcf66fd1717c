//! Category management.

use serde_json::{Map, Value};
use tracing::{info, instrument};

use nb_collection_core::CategoryId;

use crate::models::Category;
use crate::store::{SharedStore, StoreError};

/// Reads and writes the category list.
pub struct CategoryService<'a> {
    categories: &'a SharedStore<Category>,
}

impl<'a> CategoryService<'a> {
    #[must_use]
    pub const fn new(categories: &'a SharedStore<Category>) -> Self {
        Self { categories }
    }

    /// # Errors
    ///
    /// Returns an error if the category file cannot be read.
    pub async fn list(&self) -> Result<Vec<Category>, StoreError> {
        self.categories.read().await
    }

    /// # Errors
    ///
    /// Returns an error if the category file cannot be read.
    pub async fn get(&self, id: &str) -> Result<Option<Category>, StoreError> {
        Ok(self
            .categories
            .read()
            .await?
            .into_iter()
            .find(|c| c.id.matches(id)))
    }

    /// Store `fields` as a new category with a generated id.
    ///
    /// # Errors
    ///
    /// Returns an error if the category file cannot be read or written.
    #[instrument(skip_all)]
    pub async fn create(&self, fields: Map<String, Value>) -> Result<Category, StoreError> {
        let guard = self.categories.lock().await;
        let mut categories = guard.read().await?;

        let category = Category::new(CategoryId::generate(categories.iter().map(|c| &c.id)), fields);
        categories.push(category.clone());
        guard.write(&categories).await?;

        info!(category_id = %category.id, "Category created");
        Ok(category)
    }

    /// Shallow-merge `patch` into a category. Returns `None` when no
    /// category matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the category file cannot be read or written.
    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<Option<Category>, StoreError> {
        let guard = self.categories.lock().await;
        let mut categories = guard.read().await?;
        let Some(category) = categories.iter_mut().find(|c| c.id.matches(id)) else {
            return Ok(None);
        };

        category.merge(patch);
        let updated = category.clone();
        guard.write(&categories).await?;

        info!(category_id = %updated.id, "Category updated");
        Ok(Some(updated))
    }

    /// Delete a category. Returns `false` when no category matched.
    ///
    /// Products keep their category reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the category file cannot be read or written.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let guard = self.categories.lock().await;
        let mut categories = guard.read().await?;
        let before = categories.len();
        categories.retain(|c| !c.id.matches(id));
        if categories.len() == before {
            return Ok(false);
        }

        guard.write(&categories).await?;
        info!("Category deleted");
        Ok(true)
    }
}
