//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Shared-credential login and bearer tokens
//! - `catalog` - Product create/update/delete with image uploads
//! - `categories` - Category records
//! - `orders` - Order placement (validation, stock commit, rollback) and order records
//! - `uploads` - Image files in the uploads directory

pub mod auth;
pub mod catalog;
pub mod categories;
pub mod orders;
pub mod uploads;

pub use auth::{AdminAuthService, AuthError, TokenSigner};
pub use catalog::{CatalogError, CatalogService, ProductForm, UploadedFile};
pub use categories::CategoryService;
pub use orders::{FieldError, OrderService, PlaceOrderError};
pub use uploads::{UploadError, UploadStore};
