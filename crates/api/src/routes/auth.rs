//! Admin login route.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use kifaru_core::{AdminRole, Email};

use crate::db::AdminUserRepository;
use crate::error::Result;
use crate::middleware::auth_rate_limiter;
use crate::services::auth::{self, AuthError};
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The authenticated admin as returned to the dashboard.
#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub email: String,
    pub role: AdminRole,
}

/// Build the auth routes. Login is rate limited per client IP.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .layer(auth_rate_limiter())
}

/// Exchange email + password for a bearer token.
///
/// Unknown email and wrong password are indistinguishable to the caller.
#[instrument(skip(state, body), fields(email = %body.email))]
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>> {
    let email = Email::parse(&body.email).map_err(|_| AuthError::InvalidCredentials)?;

    let record = AdminUserRepository::new(state.pool())
        .get_by_email(&email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    auth::verify_password(&body.password, &record.password_hash)?;

    let token = auth::issue_token(&state.config().jwt_secret, &record.user)?;

    tracing::info!("admin logged in");

    Ok(Json(json!({
        "token": token,
        "user": LoginUser {
            email: record.user.email.to_string(),
            role: record.user.role,
        },
    })))
}
