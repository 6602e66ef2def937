//! HTTP route handlers for the marketplace API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Liveness check
//! GET    /health/ready                    - Readiness check (database ping)
//!
//! # Storefront (public)
//! GET    /api/cars                        - Published listings with filters
//! GET    /api/cars/{id}                   - Single listing
//!
//! # Auth
//! POST   /api/auth/login                  - Exchange credentials for a JWT
//!
//! # Admin (bearer token required)
//! GET    /api/admin/dashboard             - Dashboard stats
//! GET    /api/admin/cars                  - All listings, any status
//! POST   /api/admin/cars                  - Create listing (multipart)
//! PUT    /api/admin/cars/{id}             - Update listing (multipart)
//! PATCH  /api/admin/cars/{id}             - Update listing (multipart)
//! DELETE /api/admin/cars/{id}             - Delete listing
//!
//! # Settings (bearer token required)
//! GET    /api/settings                    - Composed settings document
//! PUT    /api/settings/fees               - Merge fee structure
//! PUT    /api/settings/content            - Merge content pages
//! PUT    /api/settings/notifications      - Merge notification toggles
//! PUT    /api/settings/appearance         - Merge appearance preferences
//! PUT    /api/settings/password           - Change the caller's password
//! POST   /api/settings/api-keys           - Generate an API key
//! GET    /api/settings/api-keys           - List API keys (no secrets)
//! DELETE /api/settings/api-keys/{id}      - Delete an API key
//! GET    /api/settings/sessions           - Sessions active in the last 24h
//! POST   /api/settings/sessions           - Upsert a tracked session
//! DELETE /api/settings/sessions/inactive  - Prune sessions idle > 30 days
//! ```

pub mod admin;
pub mod auth;
pub mod cars;
pub mod settings;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde_json::json;

use crate::state::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api/cars", cars::router())
        .nest("/api/auth", auth::router())
        .nest("/api/admin", admin::router())
        .nest("/api/settings", settings::router())
        .with_state(state)
}

/// Liveness probe. Answers as long as the process is up.
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Readiness probe. Verifies the database connection.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(state.pool())
        .await
    {
        Ok(_) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(error) => {
            tracing::error!(%error, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}
