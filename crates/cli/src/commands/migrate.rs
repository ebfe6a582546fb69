//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! bolt-cli migrate sessions
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string for the
//!   storefront (falls back to `DATABASE_URL`)
//!
//! The storefront never migrates on startup; run this before the first
//! deploy and after upgrading `tower-sessions-sqlx-store`.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use tower_sessions_sqlx_store::PostgresStore;

/// Errors from migration commands.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

const DATABASE_URL_VAR: &str = "STOREFRONT_DATABASE_URL";
const FALLBACK_DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Create the `tower_sessions` schema and session table.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the database is
/// unreachable, or the migration fails.
pub async fn sessions() -> Result<(), MigrationError> {
    let _ = dotenvy::dotenv();

    let database_url = database_url(|key| std::env::var(key).ok())?;

    tracing::info!("Connecting to storefront database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::info!("Running session store migration...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Session store migration complete");
    Ok(())
}

/// Resolve the database URL, preferring the storefront-specific variable.
fn database_url(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, MigrationError> {
    lookup(DATABASE_URL_VAR)
        .or_else(|| lookup(FALLBACK_DATABASE_URL_VAR))
        .filter(|url| !url.is_empty())
        .map(SecretString::from)
        .ok_or(MigrationError::MissingEnvVar(DATABASE_URL_VAR))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_storefront_url() {
        let url = database_url(|key| match key {
            DATABASE_URL_VAR => Some("postgres://storefront".to_string()),
            _ => Some("postgres://generic".to_string()),
        })
        .unwrap();
        assert_eq!(url.expose_secret(), "postgres://storefront");
    }

    #[test]
    fn test_falls_back_to_generic_url() {
        let url = database_url(|key| {
            (key == FALLBACK_DATABASE_URL_VAR).then(|| "postgres://generic".to_string())
        })
        .unwrap();
        assert_eq!(url.expose_secret(), "postgres://generic");
    }

    #[test]
    fn test_missing_url() {
        let err = database_url(|_| None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing environment variable: STOREFRONT_DATABASE_URL"
        );
    }
}
