//! Issue admin bearer tokens without going through `/login`.

use chrono::Utc;
use tracing::info;

use nb_collection_admin::config::AuthConfig;
use nb_collection_admin::services::TokenSigner;

/// Issue a token for `subject` (default: `ADMIN_USERNAME`) signed with
/// `ADMIN_TOKEN_SECRET`, and print it to stdout.
///
/// # Errors
///
/// Returns an error if the auth configuration is missing or invalid.
#[allow(clippy::print_stdout)]
pub fn issue(subject: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let auth = AuthConfig::from_env()?;
    let signer = TokenSigner::from_config(&auth);
    let subject = subject.unwrap_or(&auth.username);

    let token = signer.issue(subject, Utc::now())?;
    info!(
        subject,
        expires_in_days = auth.token_ttl_days,
        "Token issued"
    );
    println!("{token}");
    Ok(())
}
