//! Admin user repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use kifaru_core::{AdminRole, AdminUserId, Email};

use super::RepositoryError;
use crate::models::admin_user::AdminUser;

/// Internal row type for admin user queries.
#[derive(Debug, sqlx::FromRow)]
struct AdminUserRow {
    id: i32,
    email: String,
    name: String,
    role: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// An admin user together with their stored password hash.
///
/// Only the auth service sees this; handlers get [`AdminUser`].
#[derive(Debug, Clone)]
pub struct AdminUserWithHash {
    pub user: AdminUser,
    pub password_hash: String,
}

impl TryFrom<AdminUserRow> for AdminUserWithHash {
    type Error = RepositoryError;

    fn try_from(row: AdminUserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role: AdminRole = row.role.parse().map_err(|_| {
            RepositoryError::DataCorruption(format!("invalid role in database: {}", row.role))
        })?;

        Ok(Self {
            user: AdminUser {
                id: AdminUserId::new(row.id),
                email,
                name: row.name,
                role,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            password_hash: row.password_hash,
        })
    }
}

const ADMIN_USER_COLUMNS: &str =
    "id, email, name, role, password_hash, created_at, updated_at";

/// Repository for admin user database operations.
pub struct AdminUserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminUserRepository<'a> {
    /// Create a new admin user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an admin user (with password hash) by email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<AdminUserWithHash>, RepositoryError> {
        let row: Option<AdminUserRow> = sqlx::query_as(&format!(
            "SELECT {ADMIN_USER_COLUMNS} FROM admin_user WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a new admin user with a pre-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        name: &str,
        role: AdminRole,
        password_hash: &str,
    ) -> Result<AdminUser, RepositoryError> {
        let row: AdminUserRow = sqlx::query_as(&format!(
            "INSERT INTO admin_user (email, name, role, password_hash) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {ADMIN_USER_COLUMNS}"
        ))
        .bind(email.as_str())
        .bind(name)
        .bind(role.as_str())
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(AdminUserWithHash::try_from(row)?.user)
    }

    /// Replace the stored password hash for an admin user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when the user does not exist.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update_password(
        &self,
        id: AdminUserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE admin_user SET password_hash = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(password_hash)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
