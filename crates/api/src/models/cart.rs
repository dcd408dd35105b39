//! Cart models.

use atelier_core::{ArtworkId, CartLineId};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// One cart line joined with its artwork snapshot.
///
/// Price and stock here reflect the catalog *now*, not a reservation;
/// reconciliation against stock happens at checkout.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: CartLineId,
    pub artwork_id: ArtworkId,
    pub title: String,
    pub artist: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub quantity: i32,
    pub stock_quantity: i32,
}

/// Aggregate view of a user's cart.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub item_count: i64,
    pub total_quantity: i64,
    pub total_amount: Decimal,
}
