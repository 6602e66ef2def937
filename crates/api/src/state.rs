//! Shared application state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::services::cloudinary::CloudinaryClient;

/// Shared state available to all route handlers.
///
/// Cheap to clone; the inner state lives behind an [`Arc`].
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    cloudinary: Option<CloudinaryClient>,
}

impl AppState {
    /// Build the application state from configuration and a database pool.
    ///
    /// The Cloudinary client is only constructed when credentials are
    /// configured; image uploads are rejected at the handler level otherwise.
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        let cloudinary = config.cloudinary.clone().map(CloudinaryClient::new);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                cloudinary,
            }),
        }
    }

    /// Application configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Image host client, when configured.
    #[must_use]
    pub fn cloudinary(&self) -> Option<&CloudinaryClient> {
        self.inner.cloudinary.as_ref()
    }
}
