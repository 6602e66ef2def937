//! Integration tests for the Kifaru Motors marketplace API.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p kifaru-cli -- migrate
//!
//! # Start the API
//! cargo run -p kifaru-api
//!
//! # Run integration tests
//! cargo test -p kifaru-integration-tests -- --ignored
//! ```
//!
//! Tests are `#[ignore]`d by default so `cargo test` stays green without a
//! running server.

use reqwest::Client;
use serde_json::{Value, json};

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// Admin credentials used by authenticated tests. The account must exist,
/// e.g. `kifaru admin create -e admin@test.example -n Test -p test-password-1`.
#[must_use]
pub fn test_credentials() -> (String, String) {
    let email =
        std::env::var("TEST_ADMIN_EMAIL").unwrap_or_else(|_| "admin@test.example".to_string());
    let password =
        std::env::var("TEST_ADMIN_PASSWORD").unwrap_or_else(|_| "test-password-1".to_string());
    (email, password)
}

/// Log in and return a bearer token.
///
/// # Panics
///
/// Panics when the server is unreachable or the credentials are rejected;
/// integration tests cannot proceed without a token.
pub async fn login(client: &Client) -> String {
    let (email, password) = test_credentials();
    let resp = client
        .post(format!("{}/api/auth/login", api_base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to reach login endpoint");

    assert!(
        resp.status().is_success(),
        "login failed: {}",
        resp.status()
    );

    let body: Value = resp.json().await.expect("Failed to parse login response");
    body["token"]
        .as_str()
        .expect("login response carries a token")
        .to_string()
}
