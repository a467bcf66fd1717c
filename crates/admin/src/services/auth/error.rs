//! Admin authentication error types.

use thiserror::Error;

/// Errors that can occur during admin login and token checks.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Login body had no username.
    #[error("Username required.")]
    MissingUsername,

    /// Login body had no password.
    #[error("Password required.")]
    MissingPassword,

    /// Username or password did not match.
    #[error("Invalid credentials.")]
    InvalidCredentials,

    /// No `Authorization: Bearer` header on an admin request.
    #[error("missing bearer token")]
    MissingToken,

    /// The token is not `<claims>.<signature>` or its claims do not decode.
    #[error("malformed token")]
    MalformedToken,

    /// The signature does not match the claims.
    #[error("invalid token signature")]
    InvalidSignature,

    /// The token was valid but has expired.
    #[error("token expired")]
    Expired,

    /// The signing key was rejected by the MAC.
    #[error("signing key error: {0}")]
    SigningKey(String),

    /// Claims could not be encoded.
    #[error("claims encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl AuthError {
    /// Whether this error came from the login form rather than a bearer token.
    #[must_use]
    pub const fn is_login_failure(&self) -> bool {
        matches!(
            self,
            Self::MissingUsername | Self::MissingPassword | Self::InvalidCredentials
        )
    }

    /// Whether this error is the server's fault.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::SigningKey(_) | Self::Encoding(_))
    }
}
