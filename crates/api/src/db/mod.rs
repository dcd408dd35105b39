//! Database access for the Atelier `PostgreSQL` schema.
//!
//! ## Tables
//!
//! - `users` - Accounts and credentials
//! - `artworks` - The catalog (paintings and sketches)
//! - `cart_lines` - Per-user cart contents
//! - `orders` / `order_items` - Committed purchases with price snapshots
//! - `custom_sketch_requests` / `custom_painting_requests` - Commission intake
//!
//! Queries use the runtime-checked sqlx API; user-controlled values are only
//! ever bound as parameters, and sort/filter fragments come from enumerated
//! `&'static str` sets.
//!
//! Migrations live in `crates/api/migrations/` and are embedded via
//! `sqlx::migrate!`, applied at startup.

pub mod artworks;
pub mod cart;
pub mod custom_art;
pub mod orders;
pub mod users;

use std::time::Duration;

use atelier_core::OrderStatus;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors surfaced by the repository layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Row absent, inactive, or not visible to the requester.
    #[error("not found")]
    NotFound,

    /// Unique constraint violation (e.g. duplicate email).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A requested quantity exceeds what is in stock. Carries the quantity
    /// still available so clients can recover without re-querying.
    #[error("{message}")]
    InsufficientStock { available: i32, message: String },

    /// An order was placed with no items to resolve.
    #[error("no items to order")]
    EmptyOrder,

    /// Illegal order status change.
    #[error("cannot move order out of status '{current}'")]
    InvalidTransition { current: OrderStatus },

    /// A stored value failed to parse into its domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

impl RepositoryError {
    /// Map a sqlx error to `Conflict` when it is a unique violation,
    /// passing everything else through as `Database`.
    pub(crate) fn conflict_on_unique(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(format!("{what} already exists"));
        }
        Self::Database(err)
    }
}

/// A page request. Pages are 1-based; sizes are clamped to 1..=100.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    page: u32,
    per_page: u32,
}

impl Page {
    pub const DEFAULT_PER_PAGE: u32 = 20;

    #[must_use]
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 100),
        }
    }

    #[must_use]
    pub const fn number(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.per_page as i64
    }

    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.per_page as i64
    }

    /// Total number of pages for `total` matching rows.
    #[must_use]
    pub const fn total_pages(&self, total: i64) -> i64 {
        // `i64::div_ceil` is still unstable (`int_roundings`); this is its exact equivalent.
        let per = self.per_page as i64;
        let quotient = total / per;
        if total % per != 0 && (total > 0) == (per > 0) {
            quotient + 1
        } else {
            quotient
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_PER_PAGE)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Run the embedded migrations.
///
/// # Errors
///
/// Returns `sqlx::migrate::MigrateError` if a migration fails to apply.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_clamping() {
        let page = Page::new(0, 0);
        assert_eq!(page.number(), 1);
        assert_eq!(page.limit(), 1);
        assert_eq!(page.offset(), 0);

        let page = Page::new(1, 500);
        assert_eq!(page.limit(), 100);
    }

    #[test]
    fn test_page_offset() {
        let page = Page::new(3, 20);
        assert_eq!(page.offset(), 40);
        assert_eq!(page.limit(), 20);
    }

    #[test]
    fn test_total_pages() {
        let page = Page::new(1, 20);
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.total_pages(20), 1);
        assert_eq!(page.total_pages(21), 2);
    }
}
