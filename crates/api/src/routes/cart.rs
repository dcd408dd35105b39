//! Cart route handlers.

use atelier_core::{ArtworkId, CartLineId};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::db::cart::CartRepository;
use crate::error::{ApiError, Result};
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub artwork_id: ArtworkId,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

const fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

/// `GET /api/cart`
pub async fn list(AuthUser(user): AuthUser, State(state): State<AppState>) -> Result<Json<Value>> {
    let repo = CartRepository::new(state.pool());
    let items = repo.list_for_user(user.id).await?;
    let summary = repo.summary(user.id).await?;

    Ok(Json(json!({ "items": items, "summary": summary })))
}

/// `POST /api/cart`
pub async fn add(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(request): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    validate_quantity(request.quantity)?;

    let item = CartRepository::new(state.pool())
        .add_item(user.id, request.artwork_id, request.quantity)
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "item": item }))))
}

/// `PUT /api/cart/{id}`
pub async fn update_quantity(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<CartLineId>,
    Json(request): Json<UpdateQuantityRequest>,
) -> Result<Json<Value>> {
    validate_quantity(request.quantity)?;

    let item = CartRepository::new(state.pool())
        .update_quantity(id, user.id, request.quantity)
        .await?;

    Ok(Json(json!({ "item": item })))
}

/// `DELETE /api/cart/{id}`
pub async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<CartLineId>,
) -> Result<Json<Value>> {
    CartRepository::new(state.pool()).remove(id, user.id).await?;
    Ok(Json(json!({ "message": "Item removed from cart" })))
}

/// `DELETE /api/cart`
pub async fn clear(AuthUser(user): AuthUser, State(state): State<AppState>) -> Result<Json<Value>> {
    CartRepository::new(state.pool()).clear(user.id).await?;
    Ok(Json(json!({ "message": "Cart cleared" })))
}

/// `GET /api/cart/summary`
pub async fn summary(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Value>> {
    let summary = CartRepository::new(state.pool()).summary(user.id).await?;
    Ok(Json(json!({ "summary": summary })))
}

fn validate_quantity(quantity: i32) -> Result<()> {
    if quantity < 1 {
        return Err(ApiError::Validation(
            "quantity must be at least 1".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_floor() {
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(1).is_ok());
    }
}
