//! Integration tests for the public storefront routes.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p kifaru-api)
//! - Seeded listings (cargo run -p kifaru-cli -- seed)
//!
//! Run with: cargo test -p kifaru-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::Value;

use kifaru_integration_tests::api_base_url;

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_health() {
    let resp = Client::new()
        .get(format!("{}/health", api_base_url()))
        .send()
        .await
        .expect("Failed to reach health endpoint");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running API server and seeded data"]
async fn test_list_cars_envelope() {
    let resp = Client::new()
        .get(format!("{}/api/cars", api_base_url()))
        .send()
        .await
        .expect("Failed to list cars");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");

    assert!(body["cars"].is_array());
    let pagination = &body["pagination"];
    assert!(pagination["currentPage"].is_number());
    assert!(pagination["totalPages"].is_number());
    assert!(pagination["totalCars"].is_number());
    assert!(pagination["hasNext"].is_boolean());
    assert!(pagination["hasPrev"].is_boolean());

    // Only published listings are visible.
    for car in body["cars"].as_array().expect("cars is an array") {
        assert_eq!(car["status"], "Published");
        assert!(car["images"].is_array());
        assert!(car["features"].is_array());
    }
}

#[tokio::test]
#[ignore = "Requires running API server and seeded data"]
async fn test_price_filter_and_sort() {
    let resp = Client::new()
        .get(format!(
            "{}/api/cars?priceMin=1000000&priceMax=9000000&sort=price",
            api_base_url()
        ))
        .send()
        .await
        .expect("Failed to list cars");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");

    let prices: Vec<i64> = body["cars"]
        .as_array()
        .expect("cars is an array")
        .iter()
        .filter_map(|c| c["price"].as_i64())
        .collect();

    assert!(prices.iter().all(|p| (1_000_000..=9_000_000).contains(p)));
    assert!(prices.windows(2).all(|w| w[0] <= w[1]), "sorted by price");
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_unknown_filter_value_matches_nothing() {
    let resp = Client::new()
        .get(format!("{}/api/cars?fuelType=Steam", api_base_url()))
        .send()
        .await
        .expect("Failed to list cars");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["pagination"]["totalCars"], 0);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_missing_car_is_404() {
    let resp = Client::new()
        .get(format!("{}/api/cars/999999999", api_base_url()))
        .send()
        .await
        .expect("Failed to fetch car");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Car not found");
}
