//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_USERNAME` - Shared admin login name
//! - `ADMIN_PASSWORD` - Shared admin password
//! - `ADMIN_TOKEN_SECRET` - Bearer token signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 8080)
//! - `ADMIN_DATA_DIR` - Directory holding the JSON data files (default: database)
//! - `ADMIN_PUBLIC_DIR` - Directory served as static files (default: public)
//! - `ADMIN_UPLOADS_DIR` - Directory for uploaded images (default: public/uploads)
//! - `ADMIN_TOKEN_TTL_DAYS` - Bearer token lifetime in days (default: 30)
//! - `ADMIN_CORS_ORIGINS` - Comma-separated allowed origins (default: `http://localhost:5173`)
//! - `ADMIN_BODY_LIMIT_BYTES` - Maximum request body size (default: 10 MiB)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sample rates (default: 1.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

use crate::store::{CATEGORIES_FILE, ORDERS_FILE, PRODUCTS_FILE};

const MIN_TOKEN_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_TOKEN_TTL_DAYS: i64 = 30;
const DEFAULT_BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173";

/// Substrings that mark a secret as a copied placeholder (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Invalid or missing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Data and upload locations
    pub storage: StorageConfig,
    /// Shared admin credentials and token settings
    pub auth: AuthConfig,
    /// Origins allowed by CORS (credentials are allowed for these)
    pub cors_origins: Vec<String>,
    /// Maximum accepted request body in bytes
    pub body_limit_bytes: usize,
    /// Emit JSON logs instead of text
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Where data files and uploaded images live.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding `products.json`, `category.json` and `order.json`
    pub data_dir: PathBuf,
    /// Directory served under `/` for static assets
    pub public_dir: PathBuf,
    /// Directory uploaded images are written to and served from `/uploads`
    pub uploads_dir: PathBuf,
}

impl StorageConfig {
    /// Storage rooted at `root`: `root/database`, `root/public`, `root/public/uploads`.
    #[must_use]
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            data_dir: root.join("database"),
            public_dir: root.join("public"),
            uploads_dir: root.join("public").join("uploads"),
        }
    }

    /// Path of the product catalog file.
    #[must_use]
    pub fn products_path(&self) -> PathBuf {
        self.data_dir.join(PRODUCTS_FILE)
    }

    /// Path of the category file.
    #[must_use]
    pub fn categories_path(&self) -> PathBuf {
        self.data_dir.join(CATEGORIES_FILE)
    }

    /// Path of the order file.
    #[must_use]
    pub fn orders_path(&self) -> PathBuf {
        self.data_dir.join(ORDERS_FILE)
    }

    /// Read `ADMIN_DATA_DIR`, `ADMIN_PUBLIC_DIR` and `ADMIN_UPLOADS_DIR`.
    #[must_use]
    pub fn from_env() -> Self {
        let public_dir = PathBuf::from(env_or("ADMIN_PUBLIC_DIR", "public"));
        let uploads_dir =
            env_opt("ADMIN_UPLOADS_DIR").map_or_else(|| public_dir.join("uploads"), PathBuf::from);
        Self {
            data_dir: PathBuf::from(env_or("ADMIN_DATA_DIR", "database")),
            public_dir,
            uploads_dir,
        }
    }
}

/// Shared-secret admin authentication settings.
///
/// Implements `Debug` manually to redact the password and signing secret.
#[derive(Clone)]
pub struct AuthConfig {
    /// Admin login name
    pub username: String,
    /// Admin password
    pub password: SecretString,
    /// HMAC key for bearer tokens
    pub token_secret: SecretString,
    /// Token lifetime in days
    pub token_ttl_days: i64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("token_secret", &"[REDACTED]")
            .field("token_ttl_days", &self.token_ttl_days)
            .finish()
    }
}

impl AuthConfig {
    /// Read the admin credentials and token settings.
    ///
    /// # Errors
    ///
    /// Returns an error if a credential is missing or the token secret is weak.
    pub fn from_env() -> Result<Self, ConfigError> {
        let username = env_required("ADMIN_USERNAME")?;
        let password = SecretString::from(env_required("ADMIN_PASSWORD")?);

        let token_secret = env_required("ADMIN_TOKEN_SECRET")?;
        check_token_secret("ADMIN_TOKEN_SECRET", &token_secret)?;
        let token_secret = SecretString::from(token_secret);

        let token_ttl_days = env_parsed("ADMIN_TOKEN_TTL_DAYS", DEFAULT_TOKEN_TTL_DAYS)?;
        if token_ttl_days <= 0 {
            return Err(ConfigError::InvalidEnvVar(
                "ADMIN_TOKEN_TTL_DAYS".to_string(),
                format!("expected a positive number of days, got {token_ttl_days}"),
            ));
        }

        Ok(Self {
            username,
            password,
            token_secret,
            token_ttl_days,
        })
    }
}

impl AdminConfig {
    /// Read the full server configuration, loading `.env` first when present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for missing credentials, unparseable values or
    /// a weak token secret.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let host = env_parsed("ADMIN_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = env_parsed("ADMIN_PORT", 8080_u16)?;
        let storage = StorageConfig::from_env();
        let auth = AuthConfig::from_env()?;
        let cors_origins = parse_origins(&env_or("ADMIN_CORS_ORIGINS", DEFAULT_CORS_ORIGINS));
        let body_limit_bytes = env_parsed("ADMIN_BODY_LIMIT_BYTES", DEFAULT_BODY_LIMIT_BYTES)?;
        let log_json = env_opt("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json"));

        // Sentry settings never block startup
        let sentry_dsn = env_opt("SENTRY_DSN");
        let sentry_environment = env_opt("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env_parsed("SENTRY_SAMPLE_RATE", 1.0).unwrap_or(1.0);
        let sentry_traces_sample_rate = env_parsed("SENTRY_TRACES_SAMPLE_RATE", 1.0).unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            storage,
            auth,
            cors_origins,
            body_limit_bytes,
            log_json,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Configuration for tests and tools: data under `root`, the given
    /// credentials, defaults everywhere else.
    #[must_use]
    pub fn local(root: impl Into<PathBuf>, auth: AuthConfig) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8080,
            storage: StorageConfig::rooted_at(root),
            auth,
            cors_origins: parse_origins(DEFAULT_CORS_ORIGINS),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }

    /// Address the server binds to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// A set, non-empty environment variable.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

fn env_required(key: &str) -> Result<String, ConfigError> {
    env_opt(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Parse `key` as `T`, falling back to `default` when unset.
fn env_parsed<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Split a comma-separated origin list, dropping blanks and trailing slashes.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/'))
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

/// Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    let mut counts: HashMap<char, u32> = HashMap::new();
    for c in s.chars() {
        *counts.entry(c).or_default() += 1;
    }
    let total: u32 = counts.values().sum();
    if total == 0 {
        return 0.0;
    }

    counts
        .values()
        .map(|&n| {
            let p = f64::from(n) / f64::from(total);
            -p * p.log2()
        })
        .sum()
}

/// Reject short, placeholder-looking or low-entropy signing secrets.
fn check_token_secret(key: &str, secret: &str) -> Result<(), ConfigError> {
    let insecure = |reason: String| Err(ConfigError::InsecureSecret(key.to_string(), reason));

    let length = secret.chars().count();
    if length < MIN_TOKEN_SECRET_LENGTH {
        return insecure(format!(
            "must be at least {MIN_TOKEN_SECRET_LENGTH} characters (got {length})"
        ));
    }

    let lower = secret.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return insecure(format!("looks like a placeholder (contains '{pattern}')"));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return insecure(format!(
            "entropy {entropy:.2} bits/char is below {MIN_ENTROPY_BITS_PER_CHAR:.1}; generate it randomly"
        ));
    }
    Ok(())
}
