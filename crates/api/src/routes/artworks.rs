//! Catalog route handlers.

use atelier_core::{ArtworkCategory, ArtworkId};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::db::artworks::{
    ArtworkFilter, ArtworkPatch, ArtworkRepository, ArtworkSort, ArtworkSortField, NewArtwork,
    SortDirection,
};
use crate::error::{ApiError, Result};
use crate::middleware::AdminUser;
use crate::models::Artwork;
use crate::db::Page;
use crate::routes::Pagination;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkListQuery {
    pub category: Option<ArtworkCategory>,
    pub artist: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ArtworkListResponse {
    pub artworks: Vec<Artwork>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArtworkRequest {
    pub title: String,
    pub description: Option<String>,
    pub artist: String,
    pub category: ArtworkCategory,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub stock_quantity: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArtworkRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub artist: Option<String>,
    pub category: Option<ArtworkCategory>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
    pub stock_quantity: Option<i32>,
}

/// `GET /api/artworks`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ArtworkListQuery>,
) -> Result<Json<ArtworkListResponse>> {
    let filter = ArtworkFilter {
        query: None,
        category: query.category,
        artist: query.artist,
        price_min: query.min_price,
        price_max: query.max_price,
    };
    let sort = ArtworkSort {
        field: ArtworkSortField::parse_or_default(query.sort_by.as_deref()),
        direction: SortDirection::parse_or_default(query.order.as_deref()),
    };
    let page = Page::new(
        query.page.unwrap_or(1),
        query.limit.unwrap_or(Page::DEFAULT_PER_PAGE),
    );

    let (artworks, total) = ArtworkRepository::new(state.pool())
        .list(&filter, sort, page)
        .await?;

    Ok(Json(ArtworkListResponse {
        artworks,
        pagination: Pagination::new(page, total),
    }))
}

/// `GET /api/artworks/{id}`
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<ArtworkId>,
) -> Result<Json<Value>> {
    let artwork = ArtworkRepository::new(state.pool()).get(id).await?;
    Ok(Json(json!({ "artwork": artwork })))
}

/// `POST /api/artworks`
pub async fn create(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(request): Json<CreateArtworkRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    validate_price_and_stock(Some(request.price), Some(request.stock_quantity))?;
    if request.title.trim().is_empty() {
        return Err(ApiError::Validation("title is required".to_owned()));
    }
    if request.artist.trim().is_empty() {
        return Err(ApiError::Validation("artist is required".to_owned()));
    }

    let artwork = ArtworkRepository::new(state.pool())
        .create(&NewArtwork {
            title: request.title.trim().to_owned(),
            description: request.description,
            artist: request.artist.trim().to_owned(),
            category: request.category,
            price: request.price,
            image_url: request.image_url,
            stock_quantity: request.stock_quantity,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "artwork": artwork }))))
}

/// `PUT /api/artworks/{id}`
pub async fn update(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<ArtworkId>,
    Json(request): Json<UpdateArtworkRequest>,
) -> Result<Json<Value>> {
    validate_price_and_stock(request.price, request.stock_quantity)?;

    let patch = ArtworkPatch {
        title: request.title,
        description: request.description,
        artist: request.artist,
        category: request.category,
        price: request.price,
        image_url: request.image_url,
        stock_quantity: request.stock_quantity,
    };
    if patch.is_empty() {
        return Err(ApiError::Validation("no fields to update".to_owned()));
    }

    let artwork = ArtworkRepository::new(state.pool()).update(id, &patch).await?;
    Ok(Json(json!({ "artwork": artwork })))
}

/// `DELETE /api/artworks/{id}` (soft delete)
pub async fn remove(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<ArtworkId>,
) -> Result<Json<Value>> {
    ArtworkRepository::new(state.pool()).deactivate(id).await?;
    Ok(Json(json!({ "message": "Artwork deleted successfully" })))
}

fn validate_price_and_stock(price: Option<Decimal>, stock: Option<i32>) -> Result<()> {
    if let Some(price) = price
        && price < Decimal::ZERO
    {
        return Err(ApiError::Validation("price must be non-negative".to_owned()));
    }
    if let Some(stock) = stock
        && stock < 0
    {
        return Err(ApiError::Validation(
            "stockQuantity must be non-negative".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_values_rejected() {
        assert!(validate_price_and_stock(Some(Decimal::NEGATIVE_ONE), None).is_err());
        assert!(validate_price_and_stock(None, Some(-1)).is_err());
        assert!(validate_price_and_stock(Some(Decimal::ZERO), Some(0)).is_ok());
        assert!(validate_price_and_stock(None, None).is_ok());
    }
}
