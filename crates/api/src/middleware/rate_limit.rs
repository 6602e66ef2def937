//! Rate limiting middleware using governor and `tower_governor`.
//!
//! The login endpoint gets a strict per-IP limiter (~10/min) to slow down
//! credential stuffing; everything else relies on the upstream proxy.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Key extractor that trusts proxy headers for the real client IP.
///
/// Checks `X-Forwarded-For` (first hop) then `X-Real-IP`, and falls back to
/// loopback so direct local requests are still rate limited rather than
/// rejected.
#[derive(Clone, Copy)]
pub struct ProxyIpKeyExtractor;

impl tower_governor::key_extractor::KeyExtractor for ProxyIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let headers = req.headers();

        if let Some(ip) = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
        {
            return Ok(ip);
        }

        if let Some(ip) = headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
        {
            return Ok(ip);
        }

        Ok(IpAddr::V4(Ipv4Addr::LOCALHOST))
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ProxyIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for the login endpoint: ~10 requests per minute per IP.
///
/// Configuration: 1 request every 6 seconds (replenish), burst of 5.
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers (`per_second(6)` and `burst_size(5)`), which are always accepted
/// by `GovernorConfigBuilder`.
#[must_use]
pub fn auth_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ProxyIpKeyExtractor)
        .per_second(6)
        .burst_size(5)
        .finish()
        .expect("rate limiter config with per_second(6) and burst_size(5) is valid");
    GovernorLayer::new(Arc::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use tower_governor::key_extractor::KeyExtractor;

    #[test]
    fn test_forwarded_for_wins() {
        let req = Request::builder()
            .header("x-forwarded-for", HeaderValue::from_static("203.0.113.7"))
            .header("x-real-ip", HeaderValue::from_static("198.51.100.1"))
            .body(())
            .expect("request builds");
        assert_eq!(
            ProxyIpKeyExtractor.extract(&req).expect("extracts"),
            "203.0.113.7".parse::<IpAddr>().expect("valid ip")
        );
    }

    #[test]
    fn test_falls_back_to_loopback() {
        let req = Request::builder().body(()).expect("request builds");
        assert_eq!(
            ProxyIpKeyExtractor.extract(&req).expect("extracts"),
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        );
    }
}
