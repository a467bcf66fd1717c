//! NB Collection admin library.
//!
//! Product, category and order API for the NB Collection shop, backed by
//! JSON files in a data directory. Exposed as a library so the binary, the
//! CLI and the integration tests share one router and one set of services.
//!
//! The only multi-step logic is order placement (see [`services::orders`]):
//! validate, commit stock under the catalog lock, roll back on failure.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

pub use routes::app;
pub use state::AppState;
