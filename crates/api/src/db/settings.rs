//! Settings, API key and session repository.
//!
//! Settings sections live as JSONB rows keyed by section name; a missing row
//! means "defaults", which keeps the singleton invariant trivial — there is
//! nothing to create on first read, and concurrent writers upsert the same
//! keyed row.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::PgPool;

use kifaru_core::{ApiKeyId, SessionId};

use super::RepositoryError;
use crate::models::settings::{
    ApiKeySummary, AppearanceSettings, ContentPages, FeeStructure, NotificationSettings,
    SessionRecord, SettingsDocument,
};

/// Section keys in the `settings` table.
pub mod keys {
    pub const FEE_STRUCTURE: &str = "fee_structure";
    pub const CONTENT_PAGES: &str = "content_pages";
    pub const NOTIFICATION_SETTINGS: &str = "notification_settings";
    pub const APPEARANCE_SETTINGS: &str = "appearance_settings";
}

/// Internal row type for API key queries.
#[derive(Debug, sqlx::FromRow)]
struct ApiKeyRow {
    id: i32,
    name: String,
    created_at: DateTime<Utc>,
    last_used_at: Option<DateTime<Utc>>,
}

impl From<ApiKeyRow> for ApiKeySummary {
    fn from(row: ApiKeyRow) -> Self {
        Self {
            id: ApiKeyId::new(row.id),
            name: row.name,
            created_at: row.created_at,
            last_used: row.last_used_at,
        }
    }
}

/// Internal row type for session queries.
#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: i32,
    session_token: String,
    ip_address: Option<String>,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
}

impl From<SessionRow> for SessionRecord {
    fn from(row: SessionRow) -> Self {
        Self {
            id: SessionId::new(row.id),
            session_id: row.session_token,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            created_at: row.created_at,
            last_activity: row.last_activity_at,
        }
    }
}

/// Repository for dealership settings, API keys and tracked sessions.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Read one settings section, falling back to defaults when the row is
    /// absent or a stored document no longer deserializes cleanly (older
    /// documents with missing fields are filled in by serde defaults).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_section<T>(&self, key: &str) -> Result<T, RepositoryError>
    where
        T: DeserializeOwned + Default,
    {
        let value: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT value FROM settings WHERE key = $1")
                .bind(key)
                .fetch_optional(self.pool)
                .await?;

        Ok(value
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default())
    }

    /// Write one settings section.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    /// Returns `RepositoryError::DataCorruption` if the section fails to
    /// serialize (a bug rather than a runtime condition).
    pub async fn set_section<T>(&self, key: &str, section: &T) -> Result<(), RepositoryError>
    where
        T: Serialize,
    {
        let value = serde_json::to_value(section).map_err(|e| {
            RepositoryError::DataCorruption(format!("failed to serialize {key}: {e}"))
        })?;

        sqlx::query(
            "INSERT INTO settings (key, value) VALUES ($1, $2) \
             ON CONFLICT (key) DO UPDATE SET value = $2, updated_at = NOW()",
        )
        .bind(key)
        .bind(value)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Compose the full settings document (all sections plus sanitized API
    /// keys and tracked sessions).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn get_document(&self) -> Result<SettingsDocument, RepositoryError> {
        let fee_structure: FeeStructure = self.get_section(keys::FEE_STRUCTURE).await?;
        let content_pages: ContentPages = self.get_section(keys::CONTENT_PAGES).await?;
        let notification_settings: NotificationSettings =
            self.get_section(keys::NOTIFICATION_SETTINGS).await?;
        let appearance_settings: AppearanceSettings =
            self.get_section(keys::APPEARANCE_SETTINGS).await?;
        let api_keys = self.list_api_keys().await?;
        let sessions = self.list_sessions().await?;

        Ok(SettingsDocument {
            fee_structure,
            content_pages,
            notification_settings,
            appearance_settings,
            api_keys,
            sessions,
        })
    }

    // =========================================================================
    // API keys
    // =========================================================================

    /// Store a freshly generated API key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_api_key(
        &self,
        name: &str,
        secret: &str,
    ) -> Result<ApiKeySummary, RepositoryError> {
        let row: ApiKeyRow = sqlx::query_as(
            "INSERT INTO api_key (name, secret) VALUES ($1, $2) \
             RETURNING id, name, created_at, last_used_at",
        )
        .bind(name)
        .bind(secret)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// List API keys without their secrets, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_api_keys(&self) -> Result<Vec<ApiKeySummary>, RepositoryError> {
        let rows: Vec<ApiKeyRow> = sqlx::query_as(
            "SELECT id, name, created_at, last_used_at FROM api_key ORDER BY created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Delete an API key. Returns `false` when no row matched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_api_key(&self, id: ApiKeyId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM api_key WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Sessions
    // =========================================================================

    /// Upsert a session by token: refresh activity when present, insert
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn touch_session(
        &self,
        session_token: &str,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO admin_session (session_token, ip_address, user_agent) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (session_token) DO UPDATE SET last_activity_at = NOW()",
        )
        .bind(session_token)
        .bind(ip_address)
        .bind(user_agent)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// All tracked sessions, most recently active first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_sessions(&self) -> Result<Vec<SessionRecord>, RepositoryError> {
        let rows: Vec<SessionRow> = sqlx::query_as(
            "SELECT id, session_token, ip_address, user_agent, created_at, last_activity_at \
             FROM admin_session ORDER BY last_activity_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Sessions with activity within the last 24 hours.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active_sessions(&self) -> Result<Vec<SessionRecord>, RepositoryError> {
        let rows: Vec<SessionRow> = sqlx::query_as(
            "SELECT id, session_token, ip_address, user_agent, created_at, last_activity_at \
             FROM admin_session \
             WHERE last_activity_at > NOW() - INTERVAL '24 hours' \
             ORDER BY last_activity_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Number of sessions active within the last 24 hours.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_active_sessions(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM admin_session \
             WHERE last_activity_at > NOW() - INTERVAL '24 hours'",
        )
        .fetch_one(self.pool)
        .await?;
        Ok(count)
    }

    /// Remove sessions idle for more than 30 days. Returns how many were
    /// deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn clear_inactive_sessions(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM admin_session \
             WHERE last_activity_at < NOW() - INTERVAL '30 days'",
        )
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
