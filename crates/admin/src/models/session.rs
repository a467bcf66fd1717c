//! Authentication types for the admin API.
//!
//! The admin logs in once with the shared credentials and receives a signed
//! bearer token carrying these claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims carried inside an admin bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Admin username the token was issued to.
    pub sub: String,
    /// Issued-at, Unix seconds.
    pub iat: i64,
    /// Expiry, Unix seconds.
    pub exp: i64,
}

impl TokenClaims {
    /// Whether the token is expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// The authenticated admin, available to handlers via
/// [`RequireAdminAuth`](crate::middleware::RequireAdminAuth).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentAdmin {
    /// Admin username.
    pub username: String,
    /// When the presented token expires.
    pub expires_at: DateTime<Utc>,
}
