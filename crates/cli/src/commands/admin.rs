//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! kifaru admin create -e admin@example.com -n "Admin Name" -r admin -p <password>
//! ```
//!
//! # Environment Variables
//!
//! - `API_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

use thiserror::Error;

use kifaru_api::db::{AdminUserRepository, RepositoryError, create_pool};
use kifaru_api::services::auth;
use kifaru_core::{AdminRole, Email};

use super::MissingEnvVar;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    MissingEnvVar(#[from] MissingEnvVar),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository operation failed.
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: super_admin, admin")]
    InvalidRole(String),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Password fails policy or hashing failed.
    #[error("{0}")]
    Password(String),

    /// User already exists.
    #[error("Admin user already exists with email: {0}")]
    UserExists(String),
}

/// Create a new admin user with a hashed password.
///
/// # Errors
///
/// Returns [`AdminError`] when inputs are invalid, the email is taken, or
/// the database is unreachable.
pub async fn create_user(
    email: &str,
    name: &str,
    role: &str,
    password: &str,
) -> Result<i32, AdminError> {
    dotenvy::dotenv().ok();

    let role: AdminRole = role
        .parse()
        .map_err(|_| AdminError::InvalidRole(role.to_owned()))?;

    let email = Email::parse(email).map_err(|e| AdminError::InvalidEmail(e.to_string()))?;

    auth::validate_password(password).map_err(|e| AdminError::Password(e.to_string()))?;
    let password_hash =
        auth::hash_password(password).map_err(|e| AdminError::Password(e.to_string()))?;

    let database_url = super::database_url()?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;

    tracing::info!("Creating admin user: {} ({})", email, role);

    let repo = AdminUserRepository::new(&pool);
    let user = repo
        .create(&email, name, role, &password_hash)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AdminError::UserExists(email.to_string()),
            other => AdminError::Repository(other),
        })?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}, Role: {}",
        user.id,
        user.email,
        user.role
    );

    Ok(user.id.as_i32())
}
