//! Integration test support for Atelier.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and the API server
//! cargo run -p atelier-api
//!
//! # Run integration tests
//! cargo test -p atelier-integration-tests -- --ignored
//! ```
//!
//! Every test is `#[ignore]`-gated on a running server plus database;
//! `ATELIER_BASE_URL` overrides the default `http://localhost:4000`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::{Value, json};

/// Parse a JSON string field into a `Decimal`.
///
/// Amounts come over the wire as strings with database scale (`"500.00"`),
/// so comparisons go through `Decimal` rather than string equality.
///
/// # Panics
///
/// Panics if the value is not a decimal string.
#[must_use]
pub fn decimal(value: &Value) -> Decimal {
    value
        .as_str()
        .unwrap_or_else(|| panic!("expected decimal string, got {value}"))
        .parse()
        .expect("decimal parse")
}

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("ATELIER_BASE_URL").unwrap_or_else(|_| "http://localhost:4000".to_string())
}

/// A unique email per call, so tests never collide across runs.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{nanos}-{n}@test.example")
}

/// A registered user with their bearer token.
pub struct TestUser {
    pub token: String,
    pub user: Value,
}

/// Register a fresh customer account and return its token.
///
/// # Panics
///
/// Panics if the server rejects the registration.
pub async fn register_user(client: &Client, prefix: &str) -> TestUser {
    let base = base_url();
    let resp = client
        .post(format!("{base}/api/auth/register"))
        .json(&json!({
            "firstName": "Test",
            "lastName": "User",
            "email": unique_email(prefix),
            "password": "a perfectly fine password",
        }))
        .send()
        .await
        .expect("Failed to register test user");

    assert_eq!(resp.status(), 201, "registration should succeed");
    let body: Value = resp.json().await.expect("Failed to read registration body");

    TestUser {
        token: body["token"].as_str().expect("token in body").to_string(),
        user: body["user"].clone(),
    }
}

/// Bearer token for an admin account, supplied by the environment.
///
/// Create one with `atelier-cli admin create` and log in to obtain the token.
///
/// # Panics
///
/// Panics if `ATELIER_ADMIN_TOKEN` is unset.
#[must_use]
pub fn admin_token() -> String {
    std::env::var("ATELIER_ADMIN_TOKEN")
        .expect("ATELIER_ADMIN_TOKEN must be set for admin-dependent tests")
}

/// Create a catalog artwork through the admin API and return it.
///
/// # Panics
///
/// Panics if the server rejects the creation.
pub async fn create_artwork(client: &Client, price: &str, stock: i32) -> Value {
    let base = base_url();
    let resp = client
        .post(format!("{base}/api/artworks"))
        .bearer_auth(admin_token())
        .json(&json!({
            "title": format!("Test Piece {}", unique_email("t")),
            "artist": "Integration Painter",
            "category": "painting",
            "price": price,
            "stockQuantity": stock,
        }))
        .send()
        .await
        .expect("Failed to create artwork");

    assert_eq!(resp.status(), 201, "artwork creation should succeed");
    let body: Value = resp.json().await.expect("Failed to read artwork body");
    body["artwork"].clone()
}

/// Shipping address every order test can reuse.
#[must_use]
pub fn test_address() -> Value {
    json!({
        "street": "12 Gallery Lane",
        "city": "Testville",
        "state": "TS",
        "zipCode": "10001",
        "country": "Testland",
    })
}
