//! Integration tests for the authenticated admin car routes.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p kifaru-api)
//! - A test admin account (see `kifaru_integration_tests::test_credentials`)
//!
//! Run with: cargo test -p kifaru-integration-tests -- --ignored

use reqwest::{Client, StatusCode, multipart};
use serde_json::Value;

use kifaru_integration_tests::{api_base_url, login};

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_admin_routes_reject_missing_token() {
    let resp = Client::new()
        .get(format!("{}/api/admin/cars", api_base_url()))
        .send()
        .await
        .expect("Failed to reach admin endpoint");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Access denied");
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_admin_routes_reject_bad_token() {
    let resp = Client::new()
        .get(format!("{}/api/admin/cars", api_base_url()))
        .bearer_auth("not.a.valid.token")
        .send()
        .await
        .expect("Failed to reach admin endpoint");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_login_rejects_bad_credentials() {
    let resp = Client::new()
        .post(format!("{}/api/auth/login", api_base_url()))
        .json(&serde_json::json!({
            "email": "nobody@test.example",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to reach login endpoint");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
#[ignore = "Requires running API server and test admin account"]
async fn test_car_create_update_delete_roundtrip() {
    let client = Client::new();
    let token = login(&client).await;
    let base_url = api_base_url();

    // Create via multipart, the way the dashboard submits.
    let form = multipart::Form::new()
        .text("name", "Integration")
        .text("model", "Test Car")
        .text("year", "2020")
        .text("condition", "Used")
        .text("price", "1234567")
        .text("engineType", "Petrol")
        .text("transmission", "Manual")
        .text("bodyType", "Sedan")
        .text("status", "Draft")
        .text("features", "Alloy wheels, Bluetooth");

    let resp = client
        .post(format!("{base_url}/api/admin/cars"))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .expect("Failed to create car");

    assert_eq!(resp.status(), StatusCode::CREATED);
    let car: Value = resp.json().await.expect("Failed to parse created car");
    let id = car["id"].as_i64().expect("created car has an id");
    assert_eq!(car["status"], "Draft");
    assert_eq!(
        car["features"],
        serde_json::json!(["Alloy wheels", "Bluetooth"])
    );

    // Draft listings never appear on the storefront.
    let resp = client
        .get(format!("{base_url}/api/cars?search=Integration"))
        .send()
        .await
        .expect("Failed to search cars");
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["pagination"]["totalCars"], 0);

    // Quick edits PATCH a JSON body; only the submitted fields change.
    let resp = client
        .patch(format!("{base_url}/api/admin/cars/{id}"))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "status": "Published" }))
        .send()
        .await
        .expect("Failed to update car");

    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("Failed to parse updated car");
    assert_eq!(updated["status"], "Published");
    assert_eq!(updated["model"], "Test Car");

    // The full edit form submits multipart to the same route.
    let form = multipart::Form::new().text("color", "Midnight Blue");
    let resp = client
        .patch(format!("{base_url}/api/admin/cars/{id}"))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .expect("Failed to update car via form");

    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("Failed to parse updated car");
    assert_eq!(updated["color"], "Midnight Blue");
    assert_eq!(updated["status"], "Published");

    // Delete.
    let resp = client
        .delete(format!("{base_url}/api/admin/cars/{id}"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete car");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Car deleted");

    // Gone for real.
    let resp = client
        .delete(format!("{base_url}/api/admin/cars/{id}"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to re-delete car");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and test admin account"]
async fn test_dashboard_stats_shape() {
    let client = Client::new();
    let token = login(&client).await;

    let resp = client
        .get(format!("{}/api/admin/dashboard", api_base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to fetch dashboard");

    assert_eq!(resp.status(), StatusCode::OK);
    let stats: Value = resp.json().await.expect("Failed to parse stats");
    for field in [
        "totalCars",
        "totalActiveListings",
        "pendingApprovals",
        "totalRevenue",
        "newLeads",
        "activeUsers",
    ] {
        assert!(stats[field].is_number(), "missing stat: {field}");
    }
}
