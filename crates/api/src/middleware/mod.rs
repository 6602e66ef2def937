//! HTTP middleware stack for the API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS
//! 5. Rate limiting (governor, auth routes only)

pub mod auth;
pub mod rate_limit;
pub mod request_id;

pub use auth::RequireAdminAuth;
pub use rate_limit::auth_rate_limiter;
pub use request_id::request_id_middleware;
