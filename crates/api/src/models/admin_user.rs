//! Admin user model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use kifaru_core::{AdminRole, AdminUserId, Email};

/// An admin user of the dashboard.
///
/// The password hash never leaves the repository layer; this struct carries
/// only what handlers need.
#[derive(Debug, Clone, Serialize)]
pub struct AdminUser {
    pub id: AdminUserId,
    pub email: Email,
    pub name: String,
    pub role: AdminRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
