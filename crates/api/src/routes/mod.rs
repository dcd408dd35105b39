//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (database ping)
//!
//! # Auth
//! POST /api/auth/register           - Create an account, returns a token
//! POST /api/auth/login              - Login, returns a token
//! GET  /api/auth/me                 - Current user (bearer)
//!
//! # Catalog
//! GET    /api/artworks              - Public listing with filters
//! GET    /api/artworks/{id}         - Public detail
//! POST   /api/artworks              - Create (admin)
//! PUT    /api/artworks/{id}         - Partial update (admin)
//! DELETE /api/artworks/{id}         - Soft delete (admin)
//!
//! # Search
//! GET  /api/search                  - Free-text search with suggestions
//!
//! # Cart (bearer)
//! GET    /api/cart                  - List cart lines
//! POST   /api/cart                  - Add an artwork (merges quantities)
//! GET    /api/cart/summary          - Count/quantity/amount totals
//! PUT    /api/cart/{id}             - Set line quantity
//! DELETE /api/cart/{id}             - Remove one line
//! DELETE /api/cart                  - Clear the cart
//!
//! # Orders
//! POST /api/orders                  - Place an order (guest allowed)
//! GET  /api/orders                  - Own orders (bearer)
//! GET  /api/orders/{id}             - Own order detail (bearer)
//! PUT  /api/orders/{id}/cancel      - Cancel a pending order (bearer)
//! PUT  /api/orders/{id}/status      - Move status (admin)
//!
//! # Custom art (bearer)
//! POST /api/custom-art/sketch       - Priced sketch commission
//! POST /api/custom-art/painting     - Painting commission
//! GET  /api/custom-art/sketches     - Own sketch requests
//! GET  /api/custom-art/paintings    - Own painting requests
//!
//! # Users (admin)
//! GET    /api/users                 - List accounts
//! PUT    /api/users/{id}            - Partial update
//! DELETE /api/users/{id}            - Deactivate
//! ```

pub mod artworks;
pub mod auth;
pub mod cart;
pub mod custom_art;
pub mod health;
pub mod orders;
pub mod search;
pub mod users;

use axum::{
    Router,
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};

use crate::db::Page;
use crate::state::AppState;

/// Page/limit query parameters shared by every listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    #[must_use]
    pub fn to_page(&self) -> Page {
        Page::new(
            self.page.unwrap_or(1),
            self.limit.unwrap_or(Page::DEFAULT_PER_PAGE),
        )
    }
}

/// Pagination block echoed back with every listing response.
#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    #[must_use]
    pub const fn new(page: Page, total: i64) -> Self {
        Self {
            page: page.number(),
            limit: page.limit(),
            total,
            pages: page.total_pages(total),
        }
    }
}

/// Create the health check router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::liveness))
        .route("/health/ready", get(health::readiness))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
}

/// Create the catalog routes router.
pub fn artwork_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(artworks::list).post(artworks::create))
        .route(
            "/{id}",
            get(artworks::get_one)
                .put(artworks::update)
                .delete(artworks::remove),
        )
}

/// Create the search routes router.
pub fn search_routes() -> Router<AppState> {
    Router::new().route("/", get(search::search))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::list).post(cart::add).delete(cart::clear))
        .route("/summary", get(cart::summary))
        .route("/{id}", put(cart::update_quantity).delete(cart::remove))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::place).get(orders::list))
        .route("/{id}", get(orders::get_one))
        .route("/{id}/cancel", put(orders::cancel))
        .route("/{id}/status", put(orders::update_status))
}

/// Create the custom-art routes router.
pub fn custom_art_routes() -> Router<AppState> {
    Router::new()
        .route("/sketch", post(custom_art::create_sketch))
        .route("/painting", post(custom_art::create_painting))
        .route("/sketches", get(custom_art::list_sketches))
        .route("/paintings", get(custom_art::list_paintings))
}

/// Create the admin user-management router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list))
        .route("/{id}", put(users::update).delete(users::deactivate))
}
