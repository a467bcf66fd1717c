//! Authentication extractor for admin routes.
//!
//! Admin routes take a [`RequireAdminAuth`] argument; requests without a
//! valid `Authorization: Bearer <token>` header are answered with 401
//! before the handler runs.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::Utc;
use tracing::debug;

use crate::error::AppError;
use crate::models::CurrentAdmin;
use crate::services::AuthError;
use crate::state::AppState;

/// Extractor that requires admin authentication.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(admin): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.username)
/// }
/// ```
pub struct RequireAdminAuth(pub CurrentAdmin);

impl FromRequestParts<AppState> for RequireAdminAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthError::MissingToken)?;

        let admin = state.tokens().verify(token, Utc::now()).inspect_err(|e| {
            debug!(error = %e, path = %parts.uri.path(), "Admin token rejected");
        })?;

        sentry::configure_scope(|scope| {
            scope.set_user(Some(sentry::User {
                username: Some(admin.username.clone()),
                ..Default::default()
            }));
        });

        Ok(Self(admin))
    }
}

/// The token from an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
