//! Product catalog management.
//!
//! Products are created and updated from multipart forms: plain text
//! fields, `sizes`/`variants` as JSON strings, and image files. Files sent
//! as `variants[i][images][]` belong to variant `i`; every other file is a
//! product image.

use thiserror::Error;
use tracing::{info, instrument, warn};

use nb_collection_core::{Price, ProductId};

use crate::models::{ColorVariant, Product, SizeVariant};
use crate::services::uploads::{UploadError, UploadStore};
use crate::store::{SharedStore, StoreError};

/// Errors from catalog writes.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("upload error: {0}")]
    Upload(#[from] UploadError),

    /// A form field could not be interpreted.
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Product not found")]
    NotFound,
}

/// An image file received in a product form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Multipart field name, e.g. `images` or `variants[0][images][]`.
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// The variant index for `variants[i][images]...` fields.
    fn variant_index(&self) -> Option<usize> {
        let rest = self.field.strip_prefix("variants[")?;
        let (index, rest) = rest.split_once(']')?;
        rest.starts_with("[images]").then_some(())?;
        index.parse().ok()
    }
}

/// A product create/update form.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    /// JSON array of `{name, stock}`.
    pub sizes: Option<String>,
    /// JSON array of `{size, color, stock, images?}`.
    pub variants: Option<String>,
    /// Existing image paths to keep (update only).
    pub images: Vec<String>,
    pub files: Vec<UploadedFile>,
}

/// Parsed form fields, before files are stored.
struct ParsedForm {
    price: Option<Price>,
    sizes: Vec<SizeVariant>,
    variants: Option<Vec<ColorVariant>>,
}

impl ProductForm {
    fn parse(&self) -> Result<ParsedForm, CatalogError> {
        let price = self
            .price
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| {
                Price::parse(p).map_err(|e| CatalogError::InvalidField {
                    field: "price",
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        let sizes = parse_json_list(self.sizes.as_deref(), "sizes")?;
        let variants = self
            .variants
            .as_deref()
            .map(|raw| parse_json_list(Some(raw), "variants"))
            .transpose()?;

        Ok(ParsedForm {
            price,
            sizes,
            variants,
        })
    }

    fn apply_fields(&self, product: &mut Product, parsed: ParsedForm) {
        product.name = self.name.clone().unwrap_or_default();
        product.price = parsed.price;
        product.description = self.description.clone().unwrap_or_default();
        product.category = self.category.clone().filter(|c| !c.is_empty());
        product.sizes = Some(parsed.sizes);
        if parsed.variants.is_some() {
            product.variants = parsed.variants;
        }
    }
}

fn parse_json_list<T: serde::de::DeserializeOwned>(
    raw: Option<&str>,
    field: &'static str,
) -> Result<Vec<T>, CatalogError> {
    let raw = raw.map(str::trim).filter(|r| !r.is_empty()).unwrap_or("[]");
    serde_json::from_str(raw).map_err(|e| CatalogError::InvalidField {
        field,
        reason: e.to_string(),
    })
}

/// Reads and writes the product catalog.
pub struct CatalogService<'a> {
    catalog: &'a SharedStore<Product>,
    uploads: &'a UploadStore,
}

impl<'a> CatalogService<'a> {
    #[must_use]
    pub const fn new(catalog: &'a SharedStore<Product>, uploads: &'a UploadStore) -> Self {
        Self { catalog, uploads }
    }

    /// The whole catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read.
    pub async fn list(&self) -> Result<Vec<Product>, StoreError> {
        self.catalog.read().await
    }

    /// The product whose id matches `id` as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read.
    pub async fn get(&self, id: &str) -> Result<Option<Product>, StoreError> {
        Ok(self.catalog.read().await?.into_iter().find(|p| p.id.matches(id)))
    }

    /// Products in `category`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read.
    pub async fn by_category(&self, category: &str) -> Result<Vec<Product>, StoreError> {
        let mut products = self.catalog.read().await?;
        products.retain(|p| p.in_category(category));
        Ok(products)
    }

    /// Add a product built from `form`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidField` for unparseable fields, or a store/upload
    /// error. Files stored before a failure are removed again.
    #[instrument(skip_all, fields(name = form.name.as_deref().unwrap_or_default()))]
    pub async fn create(&self, form: ProductForm) -> Result<Product, CatalogError> {
        let parsed = form.parse()?;
        let catalog = self.catalog.lock().await;
        let mut products = catalog.read().await?;

        let mut product = Product::new(ProductId::generate(products.iter().map(|p| &p.id)));
        form.apply_fields(&mut product, parsed);
        self.attach_files(&mut product, &form.files).await?;

        products.push(product.clone());
        if let Err(e) = catalog.write(&products).await {
            self.uploads.remove_all(product.all_images()).await;
            return Err(e.into());
        }

        info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Replace a product's fields from `form`. Images become the kept
    /// `images` followed by newly uploaded files.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no product matches, `InvalidField` for
    /// unparseable fields, or a store/upload error.
    #[instrument(skip(self, form))]
    pub async fn update(&self, id: &str, form: ProductForm) -> Result<Product, CatalogError> {
        let parsed = form.parse()?;
        let catalog = self.catalog.lock().await;
        let mut products = catalog.read().await?;
        let slot = products
            .iter_mut()
            .find(|p| p.id.matches(id))
            .ok_or(CatalogError::NotFound)?;

        let mut product = slot.clone();
        form.apply_fields(&mut product, parsed);
        product.images.clone_from(&form.images);
        let stored = self.attach_files(&mut product, &form.files).await?;

        *slot = product.clone();
        if let Err(e) = catalog.write(&products).await {
            self.uploads
                .remove_all(stored.iter().map(String::as_str))
                .await;
            return Err(e.into());
        }

        info!(product_id = %product.id, "Product updated");
        Ok(product)
    }

    /// Delete a product and, best effort, its image files. Returns `None`
    /// when no product matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read or written.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<Option<Product>, StoreError> {
        let catalog = self.catalog.lock().await;
        let mut products = catalog.read().await?;
        let Some(index) = products.iter().position(|p| p.id.matches(id)) else {
            return Ok(None);
        };

        let removed = products.remove(index);
        catalog.write(&products).await?;
        drop(catalog);

        self.uploads.remove_all(removed.all_images()).await;
        info!(product_id = %removed.id, "Product deleted");
        Ok(Some(removed))
    }

    /// Store `files` and link them to the product or its variants.
    /// Returns the stored paths.
    async fn attach_files(
        &self,
        product: &mut Product,
        files: &[UploadedFile],
    ) -> Result<Vec<String>, CatalogError> {
        let mut stored = Vec::with_capacity(files.len());
        for file in files {
            let path = match self.uploads.save(&file.file_name, &file.bytes).await {
                Ok(path) => path,
                Err(e) => {
                    self.uploads.remove_all(stored.iter().map(String::as_str)).await;
                    return Err(e.into());
                }
            };

            let variant = file
                .variant_index()
                .and_then(|i| product.variants.as_mut()?.get_mut(i));
            match variant {
                Some(variant) => variant.images.push(path.clone()),
                None => {
                    if file.variant_index().is_some() {
                        warn!(field = %file.field, "Image for unknown variant, attached to product");
                    }
                    product.images.push(path.clone());
                }
            }
            stored.push(path);
        }
        Ok(stored)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use tempfile::{TempDir, tempdir};

    use super::*;
    use crate::models::StockSlot;
    use crate::store::{JsonFileStore, Store};

    struct Fixture {
        _dir: TempDir,
        catalog: SharedStore<Product>,
        uploads: UploadStore,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempdir().unwrap();
            let store: Arc<dyn Store<Product>> =
                Arc::new(JsonFileStore::new(dir.path().join("products.json")));
            let uploads = UploadStore::new(dir.path().join("uploads"));
            Self {
                _dir: dir,
                catalog: SharedStore::new(store),
                uploads,
            }
        }

        fn service(&self) -> CatalogService<'_> {
            CatalogService::new(&self.catalog, &self.uploads)
        }

        fn stored_files(&self) -> usize {
            std::fs::read_dir(self.uploads.dir()).map_or(0, Iterator::count)
        }
    }

    fn file(field: &str, name: &str) -> UploadedFile {
        UploadedFile {
            field: field.to_string(),
            file_name: name.to_string(),
            bytes: b"img".to_vec(),
        }
    }

    fn saree_form() -> ProductForm {
        ProductForm {
            name: Some("Silk Saree".to_string()),
            price: Some("2450".to_string()),
            description: Some("Handwoven".to_string()),
            category: Some("17".to_string()),
            sizes: Some(r#"[{"name":"Free","stock":"7"}]"#.to_string()),
            files: vec![file("images", "front view.jpg")],
            ..ProductForm::default()
        }
    }

    #[test]
    fn test_variant_index() {
        assert_eq!(file("variants[2][images][]", "a").variant_index(), Some(2));
        assert_eq!(file("variants[0][images]", "a").variant_index(), Some(0));
        assert_eq!(file("variants[x][images][]", "a").variant_index(), None);
        assert_eq!(file("variants[1][color]", "a").variant_index(), None);
        assert_eq!(file("images", "a").variant_index(), None);
    }

    #[tokio::test]
    async fn test_create_then_query() {
        let fixture = Fixture::new();
        let service = fixture.service();

        let product = service.create(saree_form()).await.unwrap();

        assert_eq!(product.name, "Silk Saree");
        assert_eq!(product.stock_at(StockSlot::Size(0)).units(), 7);
        assert_eq!(product.images.len(), 1);
        assert!(product.images[0].ends_with("-front_view.jpg"));
        assert_eq!(fixture.stored_files(), 1);

        let id = product.id.to_string();
        assert_eq!(service.get(&id).await.unwrap(), Some(product.clone()));
        assert_eq!(service.by_category("17").await.unwrap().len(), 1);
        assert!(service.by_category("18").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_with_variant_images() {
        let fixture = Fixture::new();
        let form = ProductForm {
            name: Some("Kurti".to_string()),
            variants: Some(
                r#"[{"size":"S","color":"Red","stock":"4"},{"size":"M","color":"Red","stock":"1"}]"#
                    .to_string(),
            ),
            files: vec![
                file("variants[1][images][]", "m.jpg"),
                file("cover", "cover.jpg"),
            ],
            ..ProductForm::default()
        };

        let product = fixture.service().create(form).await.unwrap();

        let variants = product.variants.as_ref().unwrap();
        assert!(variants[0].images.is_empty());
        assert_eq!(variants[1].images.len(), 1);
        assert_eq!(product.images.len(), 1);
        assert_eq!(product.sizes, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_invalid_sizes_is_rejected_before_storing_files() {
        let fixture = Fixture::new();
        let form = ProductForm {
            sizes: Some("[{".to_string()),
            ..saree_form()
        };

        let err = fixture.service().create(form).await.unwrap_err();

        assert!(matches!(err, CatalogError::InvalidField { field: "sizes", .. }));
        assert_eq!(fixture.stored_files(), 0);
        assert!(fixture.service().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_images() {
        let fixture = Fixture::new();
        let service = fixture.service();
        let created = service.create(saree_form()).await.unwrap();
        let id = created.id.to_string();

        let form = ProductForm {
            name: Some("Silk Saree (new)".to_string()),
            price: Some("2200".to_string()),
            sizes: Some(r#"[{"name":"Free","stock":"3"}]"#.to_string()),
            images: created.images.clone(),
            files: vec![file("images", "back.jpg")],
            ..ProductForm::default()
        };
        let updated = service.update(&id, form).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.creation_date, created.creation_date);
        assert_eq!(updated.price.unwrap().to_string(), "2200");
        assert_eq!(updated.category, None);
        assert_eq!(updated.images.len(), 2);
        assert_eq!(updated.images[0], created.images[0]);

        let missing = service.update("1", ProductForm::default()).await.unwrap_err();
        assert!(matches!(missing, CatalogError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_removes_record_and_files() {
        let fixture = Fixture::new();
        let service = fixture.service();
        let created = service.create(saree_form()).await.unwrap();
        let id = created.id.to_string();

        let removed = service.delete(&id).await.unwrap().unwrap();

        assert_eq!(removed.id, created.id);
        assert_eq!(fixture.stored_files(), 0);
        assert!(service.list().await.unwrap().is_empty());
        assert!(service.delete(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_assigns_unique_ids() {
        let fixture = Fixture::new();
        let service = fixture.service();
        let a = service.create(ProductForm::default()).await.unwrap();
        let b = service.create(ProductForm::default()).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(
            serde_json::to_value(service.list().await.unwrap()).unwrap()[1]["id"],
            json!(b.id.as_i64())
        );
    }
}
