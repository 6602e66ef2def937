//! Authentication extractor for admin routes.
//!
//! Admin endpoints authenticate with a bearer JWT issued at login. The
//! extractor verifies the token against the configured signing secret and, as
//! a side effect, refreshes the caller's tracked session so the settings page
//! can report active sessions.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use sha2::{Digest, Sha256};

use crate::db::SettingsRepository;
use crate::error::AppError;
use crate::services::auth::{AdminClaims, verify_token};
use crate::state::AppState;

/// Extractor that requires a valid admin bearer token.
///
/// Rejections mirror the API contract: a missing token answers
/// `401 {"message": "Access denied"}`, a token that fails verification
/// answers `400 {"message": "Invalid token"}`.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(claims): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", claims.sub)
/// }
/// ```
pub struct RequireAdminAuth(pub AdminClaims);

impl FromRequestParts<AppState> for RequireAdminAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("Access denied".to_owned()))?;

        let claims = verify_token(&state.config().jwt_secret, token)
            .map_err(|_| AppError::InvalidToken)?;

        // Session bookkeeping is best effort; a failed upsert must not block
        // an otherwise authenticated request.
        let session_token = token_fingerprint(token);
        let ip_address = client_ip(&parts.headers);
        let user_agent = header_str(&parts.headers, "user-agent");
        if let Err(error) = SettingsRepository::new(state.pool())
            .touch_session(&session_token, ip_address.as_deref(), user_agent.as_deref())
            .await
        {
            tracing::warn!(%error, "failed to record admin session activity");
        }

        Ok(Self(claims))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Stable per-token identifier for session tracking. The raw JWT never lands
/// in the database.
fn token_fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)?
        .to_str()
        .ok()
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// Best-effort client IP from proxy headers.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .or_else(|| header_str(headers, "x-real-ip"))
}
