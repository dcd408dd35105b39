//! Integration tests for order placement, cancellation, and stock.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - The API server running (cargo run -p atelier-api)
//! - `ATELIER_ADMIN_TOKEN` set to a valid admin bearer token
//!
//! Run with: cargo test -p atelier-integration-tests -- --ignored

use atelier_integration_tests::{base_url, create_artwork, decimal, register_user, test_address};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde_json::{Value, json};

async fn add_to_cart(client: &Client, token: &str, artwork_id: &Value, quantity: i32) {
    let base = base_url();
    let resp = client
        .post(format!("{base}/api/cart"))
        .bearer_auth(token)
        .json(&json!({ "artworkId": artwork_id, "quantity": quantity }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
}

async fn place_order(client: &Client, token: &str, payment_method: &str) -> (StatusCode, Value) {
    let base = base_url();
    let resp = client
        .post(format!("{base}/api/orders"))
        .bearer_auth(token)
        .json(&json!({
            "shippingAddress": test_address(),
            "paymentMethod": payment_method,
        }))
        .send()
        .await
        .unwrap();
    let status = resp.status();
    let body: Value = resp.json().await.unwrap();
    (status, body)
}

async fn stock_of(client: &Client, artwork_id: &Value) -> i64 {
    let base = base_url();
    let resp = client
        .get(format!("{base}/api/artworks/{artwork_id}"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    body["artwork"]["stockQuantity"].as_i64().unwrap()
}

#[tokio::test]
#[ignore = "Requires running API server, database, and admin token"]
async fn test_placement_decrements_stock_and_clears_cart() {
    let client = Client::new();
    let base = base_url();
    let user = register_user(&client, "place").await;
    let artwork = create_artwork(&client, "500", 5).await;

    add_to_cart(&client, &user.token, &artwork["id"], 2).await;

    let (status, body) = place_order(&client, &user.token, "credit_card").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["order"]["status"], "pending");
    assert_eq!(decimal(&body["order"]["totalAmount"]), Decimal::from(1000));

    assert_eq!(stock_of(&client, &artwork["id"]).await, 3);

    let resp = client
        .get(format!("{base}/api/cart"))
        .bearer_auth(&user.token)
        .send()
        .await
        .unwrap();
    let cart: Value = resp.json().await.unwrap();
    assert!(cart["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "Requires running API server, database, and admin token"]
async fn test_cod_adds_delivery_fee() {
    let client = Client::new();
    let user = register_user(&client, "cod").await;
    let artwork = create_artwork(&client, "500", 5).await;

    add_to_cart(&client, &user.token, &artwork["id"], 1).await;

    let (status, body) = place_order(&client, &user.token, "cod").await;
    assert_eq!(status, StatusCode::CREATED);

    let fee = decimal(&body["deliveryFee"]);
    let total = decimal(&body["order"]["totalAmount"]);
    assert_eq!(total, Decimal::from(500) + fee);
    assert!(fee > Decimal::ZERO);
}

#[tokio::test]
#[ignore = "Requires running API server, database, and admin token"]
async fn test_empty_cart_order_rejected() {
    let client = Client::new();
    let user = register_user(&client, "empty").await;

    let (status, body) = place_order(&client, &user.token, "paypal").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "empty_order");
}

#[tokio::test]
#[ignore = "Requires running API server, database, and admin token"]
async fn test_cancel_restores_stock() {
    let client = Client::new();
    let base = base_url();
    let user = register_user(&client, "cancel").await;
    let artwork = create_artwork(&client, "500", 5).await;

    add_to_cart(&client, &user.token, &artwork["id"], 2).await;
    let (_, body) = place_order(&client, &user.token, "credit_card").await;
    let order_id = body["order"]["id"].clone();
    assert_eq!(stock_of(&client, &artwork["id"]).await, 3);

    let resp = client
        .put(format!("{base}/api/orders/{order_id}/cancel"))
        .bearer_auth(&user.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(stock_of(&client, &artwork["id"]).await, 5);

    // A second cancel is an invalid transition
    let resp = client
        .put(format!("{base}/api/orders/{order_id}/cancel"))
        .bearer_auth(&user.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "invalid_transition");
    assert_eq!(body["currentStatus"], "cancelled");
}

#[tokio::test]
#[ignore = "Requires running API server, database, and admin token"]
async fn test_concurrent_placement_cannot_oversell() {
    let client = Client::new();
    let user_a = register_user(&client, "race-a").await;
    let user_b = register_user(&client, "race-b").await;
    let artwork = create_artwork(&client, "500", 1).await;

    add_to_cart(&client, &user_a.token, &artwork["id"], 1).await;
    add_to_cart(&client, &user_b.token, &artwork["id"], 1).await;

    let (a, b) = tokio::join!(
        place_order(&client, &user_a.token, "credit_card"),
        place_order(&client, &user_b.token, "credit_card"),
    );

    let successes = [a.0, b.0]
        .iter()
        .filter(|s| **s == StatusCode::CREATED)
        .count();
    assert_eq!(successes, 1, "exactly one racing order may succeed");
    assert_eq!(stock_of(&client, &artwork["id"]).await, 0);
}

#[tokio::test]
#[ignore = "Requires running API server, database, and admin token"]
async fn test_guest_checkout_with_explicit_items() {
    let client = Client::new();
    let base = base_url();
    let artwork = create_artwork(&client, "300", 5).await;

    let resp = client
        .post(format!("{base}/api/orders"))
        .json(&json!({
            "shippingAddress": test_address(),
            "paymentMethod": "paypal",
            "items": [{
                "artworkId": artwork["id"],
                "title": artwork["title"],
                "price": "300",
                "quantity": 2,
            }],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(decimal(&body["order"]["totalAmount"]), Decimal::from(600));

    // Guest path never touches stock
    assert_eq!(stock_of(&client, &artwork["id"]).await, 5);
}

#[tokio::test]
#[ignore = "Requires running API server, database, and admin token"]
async fn test_admin_cancel_of_guest_order_leaves_stock_alone() {
    let client = Client::new();
    let base = base_url();
    let artwork = create_artwork(&client, "300", 5).await;

    // Guest checkout never decrements stock, so cancelling it must not
    // restore any either.
    let resp = client
        .post(format!("{base}/api/orders"))
        .json(&json!({
            "shippingAddress": test_address(),
            "paymentMethod": "paypal",
            "items": [{
                "artworkId": artwork["id"],
                "title": artwork["title"],
                "price": "300",
                "quantity": 2,
            }],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    let order_id = body["order"]["id"].clone();
    assert_eq!(stock_of(&client, &artwork["id"]).await, 5);

    let resp = client
        .put(format!("{base}/api/orders/{order_id}/status"))
        .bearer_auth(atelier_integration_tests::admin_token())
        .json(&json!({ "status": "cancelled" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["order"]["status"], "cancelled");

    assert_eq!(stock_of(&client, &artwork["id"]).await, 5);
}

#[tokio::test]
#[ignore = "Requires running API server, database, and admin token"]
async fn test_admin_cancel_of_cart_order_restores_stock() {
    let client = Client::new();
    let base = base_url();
    let user = register_user(&client, "admin-cancel").await;
    let artwork = create_artwork(&client, "500", 5).await;

    add_to_cart(&client, &user.token, &artwork["id"], 2).await;
    let (_, body) = place_order(&client, &user.token, "credit_card").await;
    let order_id = body["order"]["id"].clone();
    assert_eq!(stock_of(&client, &artwork["id"]).await, 3);

    let resp = client
        .put(format!("{base}/api/orders/{order_id}/status"))
        .bearer_auth(atelier_integration_tests::admin_token())
        .json(&json!({ "status": "cancelled" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(stock_of(&client, &artwork["id"]).await, 5);
}

#[tokio::test]
#[ignore = "Requires running API server, database, and admin token"]
async fn test_order_snapshot_survives_catalog_edits() {
    let client = Client::new();
    let base = base_url();
    let user = register_user(&client, "snapshot").await;
    let artwork = create_artwork(&client, "400", 5).await;

    add_to_cart(&client, &user.token, &artwork["id"], 1).await;
    let (_, body) = place_order(&client, &user.token, "credit_card").await;
    let order_id = body["order"]["id"].clone();
    let artwork_id = artwork["id"].clone();

    // Reprice the artwork after the sale
    let resp = client
        .put(format!("{base}/api/artworks/{artwork_id}"))
        .bearer_auth(atelier_integration_tests::admin_token())
        .json(&json!({ "price": "9999" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base}/api/orders/{order_id}"))
        .bearer_auth(&user.token)
        .send()
        .await
        .unwrap();
    let detail: Value = resp.json().await.unwrap();
    assert_eq!(decimal(&detail["items"][0]["price"]), Decimal::from(400));
    assert_eq!(decimal(&detail["order"]["totalAmount"]), Decimal::from(400));
}
