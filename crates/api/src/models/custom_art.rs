//! Custom-art request models.

use atelier_core::{PaintingRequestId, RequestStatus, SketchRequestId, SketchSize, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A priced commission request for a sketch.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SketchRequest {
    pub id: SketchRequestId,
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub size: SketchSize,
    pub person_count: i32,
    pub photo_url: Option<String>,
    pub price: Decimal,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// An unpriced commission request for a painting.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PaintingRequest {
    pub id: PaintingRequestId,
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub description: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}
