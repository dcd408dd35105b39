//! Cart repository.
//!
//! One line per (user, artwork): re-adding the same artwork merges
//! quantities. Stock is checked on every mutation, but cart quantities are
//! never auto-corrected if stock later drops; that reconciliation happens at
//! checkout. Ownership is enforced inside the WHERE clause, so a foreign
//! line is indistinguishable from a missing one.

use atelier_core::{ArtworkId, CartLineId, UserId};
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::{CartLine, CartSummary};

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All of a user's cart lines joined with their (active) artworks,
    /// newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLine>(
            r"
            SELECT c.id, a.id AS artwork_id, a.title, a.artist, a.price,
                   a.image_url, c.quantity, a.stock_quantity
            FROM cart_lines c
            JOIN artworks a ON c.artwork_id = a.id
            WHERE c.user_id = $1 AND a.is_active = TRUE
            ORDER BY c.created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Add `quantity` of an artwork to the user's cart, merging into an
    /// existing line when one exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the artwork is absent or
    /// inactive, and `RepositoryError::InsufficientStock` if the requested
    /// (or merged) quantity exceeds current stock. The two stock messages
    /// differ: a fresh add reports total availability, a merge reports how
    /// many *additional* units can still be added.
    pub async fn add_item(
        &self,
        user_id: UserId,
        artwork_id: ArtworkId,
        quantity: i32,
    ) -> Result<CartLine, RepositoryError> {
        let artwork = sqlx::query_as::<_, ArtworkStockRow>(
            "SELECT title, stock_quantity FROM artworks WHERE id = $1 AND is_active = TRUE",
        )
        .bind(artwork_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        if quantity > artwork.stock_quantity {
            return Err(RepositoryError::InsufficientStock {
                available: artwork.stock_quantity,
                message: format!(
                    "Only {} items available for \"{}\"",
                    artwork.stock_quantity, artwork.title
                ),
            });
        }

        let existing = sqlx::query_as::<_, ExistingLineRow>(
            "SELECT id, quantity FROM cart_lines WHERE user_id = $1 AND artwork_id = $2",
        )
        .bind(user_id)
        .bind(artwork_id)
        .fetch_optional(self.pool)
        .await?;

        if let Some(line) = existing {
            let merged = line.quantity + quantity;
            if merged > artwork.stock_quantity {
                let additional = artwork.stock_quantity - line.quantity;
                return Err(RepositoryError::InsufficientStock {
                    available: additional.max(0),
                    message: format!(
                        "Cannot add {quantity} more items. Only {} additional items available.",
                        additional.max(0)
                    ),
                });
            }

            sqlx::query(
                "UPDATE cart_lines SET quantity = $1, updated_at = NOW() WHERE id = $2",
            )
            .bind(merged)
            .bind(line.id)
            .execute(self.pool)
            .await?;

            self.fetch_line(line.id).await
        } else {
            let line_id: CartLineId = sqlx::query_scalar(
                r"
                INSERT INTO cart_lines (user_id, artwork_id, quantity)
                VALUES ($1, $2, $3)
                RETURNING id
                ",
            )
            .bind(user_id)
            .bind(artwork_id)
            .bind(quantity)
            .fetch_one(self.pool)
            .await?;

            self.fetch_line(line_id).await
        }
    }

    /// Set the quantity of a cart line the user owns.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist or
    /// belongs to someone else, and `RepositoryError::InsufficientStock`
    /// if `quantity` exceeds current stock.
    pub async fn update_quantity(
        &self,
        line_id: CartLineId,
        user_id: UserId,
        quantity: i32,
    ) -> Result<CartLine, RepositoryError> {
        let row = sqlx::query_as::<_, LineStockRow>(
            r"
            SELECT a.title, a.stock_quantity
            FROM cart_lines c
            JOIN artworks a ON c.artwork_id = a.id
            WHERE c.id = $1 AND c.user_id = $2
            ",
        )
        .bind(line_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        if quantity > row.stock_quantity {
            return Err(RepositoryError::InsufficientStock {
                available: row.stock_quantity,
                message: format!(
                    "Only {} items available for \"{}\"",
                    row.stock_quantity, row.title
                ),
            });
        }

        sqlx::query("UPDATE cart_lines SET quantity = $1, updated_at = NOW() WHERE id = $2")
            .bind(quantity)
            .bind(line_id)
            .execute(self.pool)
            .await?;

        self.fetch_line(line_id).await
    }

    /// Remove one cart line the user owns.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist or
    /// belongs to someone else.
    pub async fn remove(&self, line_id: CartLineId, user_id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_lines WHERE id = $1 AND user_id = $2")
            .bind(line_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete every cart line for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn clear(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_lines WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Aggregate line count, quantity, and amount for a user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn summary(&self, user_id: UserId) -> Result<CartSummary, RepositoryError> {
        let summary = sqlx::query_as::<_, CartSummary>(
            r"
            SELECT COUNT(*) AS item_count,
                   COALESCE(SUM(c.quantity), 0)::BIGINT AS total_quantity,
                   COALESCE(SUM(c.quantity * a.price), 0) AS total_amount
            FROM cart_lines c
            JOIN artworks a ON c.artwork_id = a.id
            WHERE c.user_id = $1 AND a.is_active = TRUE
            ",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(summary)
    }

    /// Load one line joined with its artwork for response bodies.
    async fn fetch_line(&self, line_id: CartLineId) -> Result<CartLine, RepositoryError> {
        let row = sqlx::query_as::<_, CartLine>(
            r"
            SELECT c.id, a.id AS artwork_id, a.title, a.artist, a.price,
                   a.image_url, c.quantity, a.stock_quantity
            FROM cart_lines c
            JOIN artworks a ON c.artwork_id = a.id
            WHERE c.id = $1
            ",
        )
        .bind(line_id)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)
    }
}

#[derive(sqlx::FromRow)]
struct ArtworkStockRow {
    title: String,
    stock_quantity: i32,
}

#[derive(sqlx::FromRow)]
struct ExistingLineRow {
    id: CartLineId,
    quantity: i32,
}

#[derive(sqlx::FromRow)]
struct LineStockRow {
    title: String,
    stock_quantity: i32,
}
