//! Admin authentication service.
//!
//! There is a single shared admin account configured through the
//! environment. A successful login returns a bearer token of the form
//! `base64url(claims).hex(hmac_sha256(base64url(claims)))`.

mod error;

pub use error::AuthError;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use tracing::{info, warn};

use crate::config::AuthConfig;
use crate::models::{CurrentAdmin, TokenClaims};

type HmacSha256 = Hmac<Sha256>;

/// Issues and verifies admin bearer tokens.
pub struct TokenSigner {
    secret: SecretString,
    ttl: Duration,
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: SecretString, ttl_days: i64) -> Self {
        Self {
            secret,
            ttl: Duration::days(ttl_days),
        }
    }

    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.token_secret.clone(), config.token_ttl_days)
    }

    fn mac(&self) -> Result<HmacSha256, AuthError> {
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| AuthError::SigningKey(e.to_string()))
    }

    /// Issue a token for `username` valid from `now` for the configured TTL.
    ///
    /// # Errors
    ///
    /// Returns an error if the claims cannot be encoded or the key is unusable.
    pub fn issue(&self, username: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = TokenClaims {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        Ok(format!("{payload}.{signature}"))
    }

    /// Check a token's signature and expiry.
    ///
    /// # Errors
    ///
    /// Returns `MalformedToken`, `InvalidSignature` or `Expired`.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<CurrentAdmin, AuthError> {
        let (payload, signature) = token.split_once('.').ok_or(AuthError::MalformedToken)?;
        let signature = hex::decode(signature).map_err(|_| AuthError::MalformedToken)?;

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::InvalidSignature)?;

        let claims: TokenClaims = URL_SAFE_NO_PAD
            .decode(payload)
            .ok()
            .and_then(|raw| serde_json::from_slice(&raw).ok())
            .ok_or(AuthError::MalformedToken)?;

        if claims.is_expired_at(now) {
            return Err(AuthError::Expired);
        }

        let expires_at =
            DateTime::from_timestamp(claims.exp, 0).ok_or(AuthError::MalformedToken)?;
        Ok(CurrentAdmin {
            username: claims.sub,
            expires_at,
        })
    }
}

/// Checks the shared admin credentials and hands out tokens.
pub struct AdminAuthService<'a> {
    config: &'a AuthConfig,
    signer: &'a TokenSigner,
}

impl<'a> AdminAuthService<'a> {
    #[must_use]
    pub const fn new(config: &'a AuthConfig, signer: &'a TokenSigner) -> Self {
        Self { config, signer }
    }

    /// Log in with the shared credentials and return a bearer token.
    ///
    /// Empty values count as missing.
    ///
    /// # Errors
    ///
    /// Returns `MissingUsername`, `MissingPassword` or `InvalidCredentials`
    /// for bad input, in that order of precedence.
    pub fn login(&self, username: Option<&str>, password: Option<&str>) -> Result<String, AuthError> {
        let username = username
            .filter(|u| !u.is_empty())
            .ok_or(AuthError::MissingUsername)?;
        let password = password
            .filter(|p| !p.is_empty())
            .ok_or(AuthError::MissingPassword)?;

        let user_ok = constant_time_compare(username, &self.config.username);
        let password_ok =
            constant_time_compare(password, self.config.password.expose_secret());
        if !(user_ok && password_ok) {
            warn!("Admin login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.signer.issue(username, Utc::now())?;
        info!(username = %username, "Admin logged in");
        Ok(token)
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SECRET: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6";

    fn auth_config() -> AuthConfig {
        AuthConfig {
            username: "admin".to_string(),
            password: SecretString::from("s3cure-pass"),
            token_secret: SecretString::from(SECRET),
            token_ttl_days: 30,
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_718_000_000, 0).unwrap()
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("hello", "hello"));
        assert!(!constant_time_compare("hello", "world"));
        assert!(!constant_time_compare("hello", "hell"));
    }

    #[test]
    fn test_issue_then_verify() {
        let signer = TokenSigner::new(SecretString::from(SECRET), 30);
        let token = signer.issue("admin", now()).unwrap();
        let admin = signer.verify(&token, now()).unwrap();
        assert_eq!(admin.username, "admin");
        assert_eq!(admin.expires_at, now() + Duration::days(30));
    }

    #[test]
    fn test_verify_rejects_expired() {
        let signer = TokenSigner::new(SecretString::from(SECRET), 30);
        let token = signer.issue("admin", now()).unwrap();
        let later = now() + Duration::days(31);
        assert!(matches!(signer.verify(&token, later), Err(AuthError::Expired)));
    }

    #[test]
    fn test_verify_rejects_tampered_claims() {
        let signer = TokenSigner::new(SecretString::from(SECRET), 30);
        let token = signer.issue("admin", now()).unwrap();
        let (_, signature) = token.split_once('.').unwrap();
        let forged = URL_SAFE_NO_PAD.encode(br#"{"sub":"root","iat":0,"exp":9999999999}"#);
        assert!(matches!(
            signer.verify(&format!("{forged}.{signature}"), now()),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_verify_rejects_other_key_and_garbage() {
        let signer = TokenSigner::new(SecretString::from(SECRET), 30);
        let other = TokenSigner::new(SecretString::from("zC6^uW4*rT0&pQ7#nL5@mK2!xY9$aB3"), 30);
        let token = other.issue("admin", now()).unwrap();
        assert!(matches!(
            signer.verify(&token, now()),
            Err(AuthError::InvalidSignature)
        ));
        assert!(matches!(
            signer.verify("no-dot-here", now()),
            Err(AuthError::MalformedToken)
        ));
        assert!(matches!(
            signer.verify("abc.not-hex", now()),
            Err(AuthError::MalformedToken)
        ));
    }

    #[test]
    fn test_login_precedence() {
        let config = auth_config();
        let signer = TokenSigner::from_config(&config);
        let service = AdminAuthService::new(&config, &signer);

        assert!(matches!(
            service.login(None, Some("x")),
            Err(AuthError::MissingUsername)
        ));
        assert!(matches!(
            service.login(Some("admin"), Some("")),
            Err(AuthError::MissingPassword)
        ));
        assert!(matches!(
            service.login(Some("admin"), Some("wrong")),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            service.login(Some("root"), Some("s3cure-pass")),
            Err(AuthError::InvalidCredentials)
        ));

        let token = service.login(Some("admin"), Some("s3cure-pass")).unwrap();
        assert!(signer.verify(&token, Utc::now()).is_ok());
    }
}
