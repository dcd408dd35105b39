//! Commission intake repository.
//!
//! Sketch requests are priced at intake (quote computed by the caller);
//! painting requests are quoted manually later, so no price column.

use atelier_core::{Email, SketchSize, UserId};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::{Page, RepositoryError};
use crate::models::{PaintingRequest, SketchRequest};

const SKETCH_COLUMNS: &str =
    "id, user_id, name, email, size, person_count, photo_url, price, status, created_at";
const PAINTING_COLUMNS: &str = "id, user_id, name, email, phone, description, status, created_at";

/// Fields for a new sketch commission.
#[derive(Debug)]
pub struct NewSketchRequest<'a> {
    pub name: &'a str,
    pub email: &'a Email,
    pub size: SketchSize,
    pub person_count: i32,
    pub photo_url: Option<&'a str>,
}

/// Fields for a new painting commission.
#[derive(Debug)]
pub struct NewPaintingRequest<'a> {
    pub name: &'a str,
    pub email: &'a Email,
    pub phone: Option<&'a str>,
    pub description: &'a str,
}

/// Repository for custom-art request operations.
pub struct CustomArtRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomArtRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record a sketch commission with its quoted price.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_sketch_request(
        &self,
        user_id: UserId,
        request: NewSketchRequest<'_>,
        price: Decimal,
    ) -> Result<SketchRequest, RepositoryError> {
        let row = sqlx::query_as::<_, SketchRequest>(&format!(
            r"
            INSERT INTO custom_sketch_requests
                (user_id, name, email, size, person_count, photo_url, price)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {SKETCH_COLUMNS}
            "
        ))
        .bind(user_id)
        .bind(request.name)
        .bind(request.email)
        .bind(request.size)
        .bind(request.person_count)
        .bind(request.photo_url)
        .bind(price)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// Record a painting commission.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_painting_request(
        &self,
        user_id: UserId,
        request: NewPaintingRequest<'_>,
    ) -> Result<PaintingRequest, RepositoryError> {
        let row = sqlx::query_as::<_, PaintingRequest>(&format!(
            r"
            INSERT INTO custom_painting_requests (user_id, name, email, phone, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PAINTING_COLUMNS}
            "
        ))
        .bind(user_id)
        .bind(request.name)
        .bind(request.email)
        .bind(request.phone)
        .bind(request.description)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// A user's sketch requests, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_sketch_requests_for_user(
        &self,
        user_id: UserId,
        page: Page,
    ) -> Result<(Vec<SketchRequest>, i64), RepositoryError> {
        let rows = sqlx::query_as::<_, SketchRequest>(&format!(
            "SELECT {SKETCH_COLUMNS} FROM custom_sketch_requests \
             WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM custom_sketch_requests WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(self.pool)
                .await?;

        Ok((rows, total))
    }

    /// A user's painting requests, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_painting_requests_for_user(
        &self,
        user_id: UserId,
        page: Page,
    ) -> Result<(Vec<PaintingRequest>, i64), RepositoryError> {
        let rows = sqlx::query_as::<_, PaintingRequest>(&format!(
            "SELECT {PAINTING_COLUMNS} FROM custom_painting_requests \
             WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM custom_painting_requests WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(self.pool)
                .await?;

        Ok((rows, total))
    }
}
