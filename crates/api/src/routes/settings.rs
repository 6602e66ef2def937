//! Authenticated settings routes.
//!
//! The settings document is a logical singleton: each section merges the
//! submitted fields over the stored section and answers with the full
//! composed document so the dashboard can refresh in one round trip.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, put},
};
use rand::RngCore;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use kifaru_core::{ApiKeyId, Email};

use crate::db::{AdminUserRepository, SettingsRepository, settings::keys};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::{
    ApiKeySummary, AppearanceSettings, AppearanceSettingsUpdate, ContentPages, ContentPagesUpdate,
    FeeStructure, FeeStructureUpdate, NotificationSettings, NotificationSettingsUpdate,
    SessionRecord, SettingsDocument,
};
use crate::services::auth;
use crate::state::AppState;

/// Build the settings routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_settings))
        .route("/fees", put(update_fees))
        .route("/content", put(update_content))
        .route("/notifications", put(update_notifications))
        .route("/appearance", put(update_appearance))
        .route("/password", put(change_password))
        .route("/api-keys", get(list_api_keys).post(create_api_key))
        .route("/api-keys/{id}", delete(delete_api_key))
        .route("/sessions", get(list_sessions).post(record_session))
        .route("/sessions/inactive", delete(clear_inactive_sessions))
}

/// The composed settings document.
#[instrument(skip_all)]
async fn get_settings(
    RequireAdminAuth(_claims): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<SettingsDocument>> {
    let document = SettingsRepository::new(state.pool()).get_document().await?;
    Ok(Json(document))
}

/// Merge a patch over one stored section and answer with the full document.
///
/// The dashboard wraps each patch under its section key
/// (`{"feeStructure": {...}}`); the envelope type makes that key required so
/// an unwrapped body is rejected instead of merging nothing.
macro_rules! section_handler {
    ($fn_name:ident, $section:ty, $envelope:ty, $field:ident, $key:expr, $message:expr) => {
        #[instrument(skip_all)]
        async fn $fn_name(
            RequireAdminAuth(_claims): RequireAdminAuth,
            State(state): State<AppState>,
            Json(body): Json<$envelope>,
        ) -> Result<Json<serde_json::Value>> {
            let repo = SettingsRepository::new(state.pool());

            let mut section: $section = repo.get_section($key).await?;
            section.apply(body.$field);
            repo.set_section($key, &section).await?;

            let document = repo.get_document().await?;
            Ok(Json(json!({ "message": $message, "settings": document })))
        }
    };
}

section_handler!(
    update_fees,
    FeeStructure,
    FeeStructureUpdate,
    fee_structure,
    keys::FEE_STRUCTURE,
    "Fee structure updated successfully"
);
section_handler!(
    update_content,
    ContentPages,
    ContentPagesUpdate,
    content_pages,
    keys::CONTENT_PAGES,
    "Content pages updated successfully"
);
section_handler!(
    update_notifications,
    NotificationSettings,
    NotificationSettingsUpdate,
    notification_settings,
    keys::NOTIFICATION_SETTINGS,
    "Notification settings updated successfully"
);
section_handler!(
    update_appearance,
    AppearanceSettings,
    AppearanceSettingsUpdate,
    appearance_settings,
    keys::APPEARANCE_SETTINGS,
    "Appearance settings updated successfully"
);

/// Password change request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Change the calling admin's password.
#[instrument(skip_all)]
async fn change_password(
    RequireAdminAuth(claims): RequireAdminAuth,
    State(state): State<AppState>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>> {
    let email = Email::parse(&claims.sub)
        .map_err(|_| AppError::BadRequest("Invalid account".to_owned()))?;

    let repo = AdminUserRepository::new(state.pool());
    let record = repo
        .get_by_email(&email)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid account".to_owned()))?;

    if auth::verify_password(&body.current_password, &record.password_hash).is_err() {
        return Err(AppError::BadRequest(
            "Current password is incorrect".to_owned(),
        ));
    }

    auth::validate_password(&body.new_password)?;
    let hash = auth::hash_password(&body.new_password)?;
    repo.update_password(record.user.id, &hash).await?;

    tracing::info!("admin password changed");
    Ok(Json(json!({ "message": "Password changed successfully" })))
}

/// API key creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateApiKeyRequest {
    pub name: String,
}

/// Generate and store a new API key. The plaintext key is returned exactly
/// once.
#[instrument(skip_all)]
async fn create_api_key(
    RequireAdminAuth(_claims): RequireAdminAuth,
    State(state): State<AppState>,
    Json(body): Json<CreateApiKeyRequest>,
) -> Result<Json<serde_json::Value>> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required".to_owned()));
    }

    let secret = generate_key();
    let summary = SettingsRepository::new(state.pool())
        .create_api_key(name, &secret)
        .await?;

    tracing::info!(key_id = %summary.id, "api key created");
    Ok(Json(json!({
        "message": "API key generated successfully",
        "apiKey": secret,
    })))
}

/// List API keys; key material is never included.
#[instrument(skip_all)]
async fn list_api_keys(
    RequireAdminAuth(_claims): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<ApiKeySummary>>> {
    let keys = SettingsRepository::new(state.pool()).list_api_keys().await?;
    Ok(Json(keys))
}

/// Delete an API key.
#[instrument(skip_all, fields(key_id = id))]
async fn delete_api_key(
    RequireAdminAuth(_claims): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>> {
    let deleted = SettingsRepository::new(state.pool())
        .delete_api_key(ApiKeyId::new(id))
        .await?;

    if !deleted {
        return Err(AppError::NotFound("API key not found".to_owned()));
    }
    Ok(Json(json!({ "message": "API key deleted" })))
}

/// Sessions active within the last 24 hours.
#[instrument(skip_all)]
async fn list_sessions(
    RequireAdminAuth(_claims): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<SessionRecord>>> {
    let sessions = SettingsRepository::new(state.pool())
        .list_active_sessions()
        .await?;
    Ok(Json(sessions))
}

/// Session upsert request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSessionRequest {
    pub session_id: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Upsert a tracked session keyed by its ID.
#[instrument(skip_all)]
async fn record_session(
    RequireAdminAuth(_claims): RequireAdminAuth,
    State(state): State<AppState>,
    Json(body): Json<RecordSessionRequest>,
) -> Result<Json<serde_json::Value>> {
    if body.session_id.trim().is_empty() {
        return Err(AppError::BadRequest("Session ID is required".to_owned()));
    }

    SettingsRepository::new(state.pool())
        .touch_session(
            body.session_id.trim(),
            body.ip_address.as_deref(),
            body.user_agent.as_deref(),
        )
        .await?;

    Ok(Json(json!({ "message": "Session recorded" })))
}

/// Prune sessions idle for more than 30 days.
#[instrument(skip_all)]
async fn clear_inactive_sessions(
    RequireAdminAuth(_claims): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>> {
    let removed = SettingsRepository::new(state.pool())
        .clear_inactive_sessions()
        .await?;

    tracing::info!(removed, "inactive sessions cleared");
    Ok(Json(json!({ "message": "Inactive sessions cleared", "removed": removed })))
}

/// 32 random bytes, hex encoded.
fn generate_key() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
