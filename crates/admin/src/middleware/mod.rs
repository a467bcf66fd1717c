//! HTTP middleware for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with method, uri, status, latency)
//! 3. Request ID (record on span, echo in response)
//! 4. CORS (configured origins, credentials allowed)
//! 5. Body limit
//!
//! Admin-only handlers additionally take the [`RequireAdminAuth`] extractor.

pub mod auth;
pub mod request_id;

pub use auth::RequireAdminAuth;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
