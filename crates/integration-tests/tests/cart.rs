//! Integration tests for cart behavior.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - The API server running (cargo run -p atelier-api)
//! - `ATELIER_ADMIN_TOKEN` set to a valid admin bearer token
//!
//! Run with: cargo test -p atelier-integration-tests -- --ignored

use atelier_integration_tests::{base_url, create_artwork, decimal, register_user};
use rust_decimal::Decimal;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running API server, database, and admin token"]
async fn test_add_same_artwork_merges_quantities() {
    let client = Client::new();
    let base = base_url();
    let user = register_user(&client, "merge").await;
    let artwork = create_artwork(&client, "100", 10).await;

    for _ in 0..2 {
        let resp = client
            .post(format!("{base}/api/cart"))
            .bearer_auth(&user.token)
            .json(&json!({ "artworkId": artwork["id"], "quantity": 2 }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = client
        .get(format!("{base}/api/cart"))
        .bearer_auth(&user.token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let items = body["items"].as_array().unwrap();

    // One line, merged quantity
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 4);
}

#[tokio::test]
#[ignore = "Requires running API server, database, and admin token"]
async fn test_merge_past_stock_reports_additional_available() {
    let client = Client::new();
    let base = base_url();
    let user = register_user(&client, "overadd").await;
    let artwork = create_artwork(&client, "100", 3).await;

    let resp = client
        .post(format!("{base}/api/cart"))
        .bearer_auth(&user.token)
        .json(&json!({ "artworkId": artwork["id"], "quantity": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .post(format!("{base}/api/cart"))
        .bearer_auth(&user.token)
        .json(&json!({ "artworkId": artwork["id"], "quantity": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_stock");
    assert_eq!(body["available"], 1);
}

#[tokio::test]
#[ignore = "Requires running API server, database, and admin token"]
async fn test_cross_user_line_access_is_not_found() {
    let client = Client::new();
    let base = base_url();
    let owner = register_user(&client, "owner").await;
    let intruder = register_user(&client, "intruder").await;
    let artwork = create_artwork(&client, "100", 5).await;

    let resp = client
        .post(format!("{base}/api/cart"))
        .bearer_auth(&owner.token)
        .json(&json!({ "artworkId": artwork["id"], "quantity": 1 }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let line_id = body["item"]["id"].clone();

    let resp = client
        .put(format!("{base}/api/cart/{line_id}"))
        .bearer_auth(&intruder.token)
        .json(&json!({ "quantity": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server, database, and admin token"]
async fn test_summary_totals() {
    let client = Client::new();
    let base = base_url();
    let user = register_user(&client, "summary").await;
    let artwork = create_artwork(&client, "250", 10).await;

    let resp = client
        .post(format!("{base}/api/cart"))
        .bearer_auth(&user.token)
        .json(&json!({ "artworkId": artwork["id"], "quantity": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .get(format!("{base}/api/cart/summary"))
        .bearer_auth(&user.token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["summary"]["itemCount"], 1);
    assert_eq!(body["summary"]["totalQuantity"], 3);
    assert_eq!(decimal(&body["summary"]["totalAmount"]), Decimal::from(750));
}
