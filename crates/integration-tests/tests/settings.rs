//! Integration tests for the authenticated settings routes.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p kifaru-api)
//! - A test admin account (see `kifaru_integration_tests::test_credentials`)
//!
//! Run with: cargo test -p kifaru-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use kifaru_integration_tests::{api_base_url, login};

#[tokio::test]
#[ignore = "Requires running API server and test admin account"]
async fn test_settings_document_shape() {
    let client = Client::new();
    let token = login(&client).await;

    let resp = client
        .get(format!("{}/api/settings", api_base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to fetch settings");

    assert_eq!(resp.status(), StatusCode::OK);
    let settings: Value = resp.json().await.expect("Failed to parse settings");

    // Every section is present even on a fresh database (lazy defaults).
    assert!(settings["feeStructure"]["dealerCommission"].is_number());
    assert!(settings["contentPages"].is_object());
    assert!(settings["notificationSettings"].is_object());
    assert!(settings["appearanceSettings"].is_object());
    assert!(settings["apiKeys"].is_array());
    assert!(settings["sessions"].is_array());
}

#[tokio::test]
#[ignore = "Requires running API server and test admin account"]
async fn test_fee_merge_is_partial() {
    let client = Client::new();
    let token = login(&client).await;
    let base_url = api_base_url();

    // The dashboard wraps the patch under its section key.
    let resp = client
        .put(format!("{base_url}/api/settings/fees"))
        .bearer_auth(&token)
        .json(&json!({ "feeStructure": { "dealerCommission": 6.5 } }))
        .send()
        .await
        .expect("Failed to update fees");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Fee structure updated successfully");
    let fees = &body["settings"]["feeStructure"];

    assert_eq!(fees["dealerCommission"], 6.5);
    // Untouched fields keep their stored values.
    assert!(fees["individualCommission"].is_number());
    assert!(fees["premiumListingFee"].is_number());

    // An unwrapped body is not a valid section update.
    let resp = client
        .put(format!("{base_url}/api/settings/fees"))
        .bearer_auth(&token)
        .json(&json!({ "dealerCommission": 9.9 }))
        .send()
        .await
        .expect("Failed to reach fees endpoint");
    assert!(
        resp.status().is_client_error(),
        "bare fields must be rejected, got {}",
        resp.status()
    );
}

#[tokio::test]
#[ignore = "Requires running API server and test admin account"]
async fn test_api_key_lifecycle() {
    let client = Client::new();
    let token = login(&client).await;
    let base_url = api_base_url();

    // Generate: the plaintext key appears exactly once.
    let resp = client
        .post(format!("{base_url}/api/settings/api-keys"))
        .bearer_auth(&token)
        .json(&json!({ "name": "integration-test" }))
        .send()
        .await
        .expect("Failed to create api key");

    assert_eq!(resp.status(), StatusCode::OK);
    let created: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(created["message"], "API key generated successfully");
    let secret = created["apiKey"].as_str().expect("plaintext key returned");
    assert_eq!(secret.len(), 64);

    // Listing never exposes key material.
    let resp = client
        .get(format!("{base_url}/api/settings/api-keys"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list api keys");

    assert_eq!(resp.status(), StatusCode::OK);
    let keys: Value = resp.json().await.expect("Failed to parse response");
    let entry = keys
        .as_array()
        .expect("keys is an array")
        .iter()
        .find(|k| k["name"] == "integration-test")
        .expect("created key is listed");
    assert!(entry.get("key").is_none());
    assert!(entry.get("apiKey").is_none());
    let id = entry["id"].as_i64().expect("listed key has an id");

    // Delete.
    let resp = client
        .delete(format!("{base_url}/api/settings/api-keys/{id}"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete api key");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .delete(format!("{base_url}/api/settings/api-keys/{id}"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to re-delete api key");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and test admin account"]
async fn test_wrong_current_password_rejected() {
    let client = Client::new();
    let token = login(&client).await;

    let resp = client
        .put(format!("{}/api/settings/password", api_base_url()))
        .bearer_auth(&token)
        .json(&json!({
            "currentPassword": "definitely-wrong",
            "newPassword": "another-long-password"
        }))
        .send()
        .await
        .expect("Failed to reach password endpoint");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Current password is incorrect");
}

#[tokio::test]
#[ignore = "Requires running API server and test admin account"]
async fn test_session_recording() {
    let client = Client::new();
    let token = login(&client).await;
    let base_url = api_base_url();

    let resp = client
        .post(format!("{base_url}/api/settings/sessions"))
        .bearer_auth(&token)
        .json(&json!({
            "sessionId": "integration-test-session",
            "ipAddress": "203.0.113.5",
            "userAgent": "integration-tests"
        }))
        .send()
        .await
        .expect("Failed to record session");

    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/api/settings/sessions"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list sessions");

    assert_eq!(resp.status(), StatusCode::OK);
    let sessions: Value = resp.json().await.expect("Failed to parse sessions");
    assert!(
        sessions
            .as_array()
            .expect("sessions is an array")
            .iter()
            .any(|s| s["sessionId"] == "integration-test-session"),
        "recorded session is listed as active"
    );
}
