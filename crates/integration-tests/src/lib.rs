//! Integration tests for the NB Collection admin server.
//!
//! Every test starts its own server on an ephemeral port with a fresh
//! temporary data directory, then talks to it over HTTP with `reqwest`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p nb-collection-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog` - Products, categories, uploads and admin auth
//! - `orders` - Order placement and stock bookkeeping

use std::net::SocketAddr;
use std::path::Path;

use reqwest::{Client, Response, StatusCode};
use secrecy::SecretString;
use serde_json::{Value, json};
use tempfile::TempDir;

use nb_collection_admin::AppState;
use nb_collection_admin::config::{AdminConfig, AuthConfig};

/// Admin username used by every test server.
pub const ADMIN_USERNAME: &str = "admin";
/// Admin password used by every test server.
pub const ADMIN_PASSWORD: &str = "integration-pass";

/// A running admin server backed by a temporary data directory.
pub struct TestServer {
    pub client: Client,
    pub addr: SocketAddr,
    pub state: AppState,
    dir: TempDir,
}

impl TestServer {
    /// Start a server with empty data files.
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = AdminConfig::local(
            dir.path(),
            AuthConfig {
                username: ADMIN_USERNAME.to_string(),
                password: SecretString::from(ADMIN_PASSWORD),
                token_secret: SecretString::from("Zq8!vR2#kP5$wL9@xN3%tB7^mC1&hJ4*"),
                token_ttl_days: 1,
            },
        );
        std::fs::create_dir_all(&config.storage.data_dir).expect("Failed to create data dir");
        std::fs::create_dir_all(&config.storage.uploads_dir)
            .expect("Failed to create uploads dir");

        let state = AppState::new(config);
        let app = nb_collection_admin::app(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        Self {
            client: Client::new(),
            addr,
            state,
            dir,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Root of the temporary directory (`database/`, `public/` live below).
    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `products.json` directly.
    pub fn write_products(&self, products: &Value) {
        let path = self.state.config().storage.products_path();
        let json = serde_json::to_string_pretty(products).expect("Failed to encode products");
        std::fs::write(path, json).expect("Failed to write products.json");
    }

    /// Raw contents of `products.json`.
    #[must_use]
    pub fn products_file(&self) -> String {
        std::fs::read_to_string(self.state.config().storage.products_path()).unwrap_or_default()
    }

    /// Log in with the test credentials and return the bearer token.
    pub async fn login(&self) -> String {
        let resp = self
            .client
            .post(self.url("/login"))
            .json(&json!({"username": ADMIN_USERNAME, "password": ADMIN_PASSWORD}))
            .send()
            .await
            .expect("Failed to send login");
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.expect("Failed to read login response");
        body["token"]
            .as_str()
            .expect("login response has no token")
            .to_string()
    }

    /// GET `path` and decode the JSON body.
    pub async fn get_json(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut req = self.client.get(self.url(path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        json_response(req.send().await.expect("Failed to send GET")).await
    }

    /// POST `/order` with `body`.
    pub async fn place_order(&self, body: &Value) -> (StatusCode, Value) {
        let resp = self
            .client
            .post(self.url("/order"))
            .json(body)
            .send()
            .await
            .expect("Failed to send order");
        json_response(resp).await
    }
}

/// Split a response into status and JSON body (`Null` when not JSON).
pub async fn json_response(resp: Response) -> (StatusCode, Value) {
    let status = resp.status();
    let body = resp.json().await.unwrap_or(Value::Null);
    (status, body)
}

/// A checkout body with valid customer fields and the given line items.
#[must_use]
pub fn checkout(products: Value) -> Value {
    json!({
        "phone": "01812345678",
        "name": "Nusrat Jahan",
        "address": "Flat 3B, Road 27, Dhanmondi",
        "city": "Dhaka",
        "postalCode": "1209",
        "paymentType": "online",
        "paymentMethod": "bKash",
        "transactionId": "8N7A6B5C4D",
        "products": products
    })
}
