//! Order models.

use atelier_core::{ArtworkCategory, ArtworkId, OrderId, OrderStatus, PaymentMethod, PaymentStatus, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Structured shipping address embedded in an order row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl ShippingAddress {
    /// All fields are required and must be non-empty.
    #[must_use]
    pub fn first_missing_field(&self) -> Option<&'static str> {
        if self.street.trim().is_empty() {
            Some("street")
        } else if self.city.trim().is_empty() {
            Some("city")
        } else if self.state.trim().is_empty() {
            Some("state")
        } else if self.zip_code.trim().is_empty() {
            Some("zipCode")
        } else if self.country.trim().is_empty() {
            Some("country")
        } else {
            None
        }
    }
}

/// A committed purchase. Never deleted; cancellation is a status change.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub user_id: Option<UserId>,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub total_amount: Decimal,
    #[sqlx(flatten)]
    pub shipping_address: ShippingAddress,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Immutable snapshot of one purchased artwork.
///
/// Title and price are copied at purchase time so later catalog edits never
/// alter historical orders. Deserializable because guest checkout submits
/// item lists directly.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub artwork_id: ArtworkId,
    pub title: String,
    pub price: Decimal,
    pub quantity: i32,
}

/// Order item enriched with live artwork presentation fields for detail views.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDetail {
    pub artwork_id: ArtworkId,
    pub title: String,
    pub price: Decimal,
    pub quantity: i32,
    pub artist: String,
    pub category: ArtworkCategory,
    pub image_url: Option<String>,
}
