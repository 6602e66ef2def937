//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Resolve the database connection string from the environment.
///
/// `API_DATABASE_URL` wins; `DATABASE_URL` is the shared fallback.
pub(crate) fn database_url() -> Result<SecretString, MissingEnvVar> {
    std::env::var("API_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| MissingEnvVar("API_DATABASE_URL or DATABASE_URL"))
}

/// Required environment variable is missing.
#[derive(Debug, thiserror::Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVar(pub &'static str);
