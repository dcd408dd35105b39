//! Integration tests for registration and login.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - The API server running (cargo run -p atelier-api)
//!
//! Run with: cargo test -p atelier-integration-tests -- --ignored

use atelier_integration_tests::{base_url, register_user, unique_email};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_register_then_login() {
    let client = Client::new();
    let base = base_url();
    let email = unique_email("login");

    let resp = client
        .post(format!("{base}/api/auth/register"))
        .json(&json!({
            "firstName": "Iris",
            "lastName": "Tester",
            "email": email,
            "password": "a perfectly fine password",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .post(format!("{base}/api/auth/login"))
        .json(&json!({ "email": email, "password": "a perfectly fine password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["email"], email);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_duplicate_email_conflicts() {
    let client = Client::new();
    let base = base_url();
    let email = unique_email("dup");

    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let resp = client
            .post(format!("{base}/api/auth/register"))
            .json(&json!({
                "firstName": "Dup",
                "lastName": "User",
                "email": email,
                "password": "a perfectly fine password",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), expected);
    }
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_wrong_password_rejected() {
    let client = Client::new();
    let base = base_url();
    let user = register_user(&client, "wrongpw").await;

    let resp = client
        .post(format!("{base}/api/auth/login"))
        .json(&json!({
            "email": user.user["email"],
            "password": "not the password",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_me_requires_token() {
    let client = Client::new();
    let base = base_url();

    let resp = client
        .get(format!("{base}/api/auth/me"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let user = register_user(&client, "me").await;
    let resp = client
        .get(format!("{base}/api/auth/me"))
        .bearer_auth(&user.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
