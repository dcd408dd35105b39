//! Catalog artwork model.

use atelier_core::{ArtworkCategory, ArtworkId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A sellable catalog item (painting or sketch).
///
/// Inactive artworks are soft-deleted: hidden from every read path but kept
/// in the table because order items reference them.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    pub id: ArtworkId,
    pub title: String,
    pub description: Option<String>,
    pub artist: String,
    pub category: ArtworkCategory,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub stock_quantity: i32,
    pub created_at: DateTime<Utc>,
}
