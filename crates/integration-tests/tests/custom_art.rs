//! Integration tests for commission intake and search.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - The API server running (cargo run -p atelier-api)
//! - `ATELIER_ADMIN_TOKEN` set for the search test (catalog setup)
//!
//! Run with: cargo test -p atelier-integration-tests -- --ignored

use atelier_integration_tests::{base_url, create_artwork, decimal, register_user, unique_email};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_sketch_request_is_priced_at_intake() {
    let client = Client::new();
    let base = base_url();
    let user = register_user(&client, "sketch").await;

    // Four people on A3: (1600 + 400) * 1.3 = 2600
    let resp = client
        .post(format!("{base}/api/custom-art/sketch"))
        .bearer_auth(&user.token)
        .json(&json!({
            "name": "Sketch Buyer",
            "email": unique_email("sketch-req"),
            "size": "A3",
            "personCount": 4,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(decimal(&body["request"]["price"]), Decimal::from(2600));
    assert_eq!(body["request"]["status"], "pending");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_painting_request_requires_description() {
    let client = Client::new();
    let base = base_url();
    let user = register_user(&client, "paint").await;

    let resp = client
        .post(format!("{base}/api/custom-art/painting"))
        .bearer_auth(&user.token)
        .json(&json!({
            "name": "Painting Buyer",
            "email": unique_email("paint-req"),
            "description": "   ",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "validation");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_request_listing_is_owner_scoped() {
    let client = Client::new();
    let base = base_url();
    let alice = register_user(&client, "req-alice").await;
    let bob = register_user(&client, "req-bob").await;

    let resp = client
        .post(format!("{base}/api/custom-art/sketch"))
        .bearer_auth(&alice.token)
        .json(&json!({
            "name": "Alice",
            "email": unique_email("alice-req"),
            "size": "A4",
            "personCount": 1,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .get(format!("{base}/api/custom-art/sketches"))
        .bearer_auth(&bob.token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert!(body["requests"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "Requires running API server, database, and admin token"]
async fn test_search_finds_title_and_suggests() {
    let client = Client::new();
    let base = base_url();
    let artwork = create_artwork(&client, "800", 3).await;
    let title = artwork["title"].as_str().unwrap();

    let resp = client
        .get(format!("{base}/api/search"))
        .query(&[("q", title)])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();

    let results = body["results"].as_array().unwrap();
    assert!(results.iter().any(|r| r["title"] == title));
    assert!(!body["suggestions"].as_array().unwrap().is_empty());
}
