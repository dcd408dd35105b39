//! Order route handlers.

use atelier_core::{OrderId, OrderStatus, PaymentMethod};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::db::Page;
use crate::db::orders::OrderRepository;
use crate::error::{ApiError, Result};
use crate::middleware::{AdminUser, AuthUser, OptionalAuthUser};
use crate::models::{Order, OrderItem, ShippingAddress};
use crate::routes::Pagination;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    /// Explicit item list for guest checkout; authenticated users normally
    /// omit this and order their cart.
    pub items: Option<Vec<OrderItem>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    pub message: &'static str,
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub delivery_fee: rust_decimal::Decimal,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// `POST /api/orders`
///
/// Guest checkout is allowed: without a bearer token the request must carry
/// an explicit item list.
pub async fn place(
    OptionalAuthUser(user): OptionalAuthUser,
    State(state): State<AppState>,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<PlaceOrderResponse>)> {
    if let Some(field) = request.shipping_address.first_missing_field() {
        return Err(ApiError::Validation(format!("{field} is required")));
    }
    if let Some(items) = &request.items
        && items.iter().any(|item| item.quantity < 1)
    {
        return Err(ApiError::Validation(
            "item quantity must be at least 1".to_owned(),
        ));
    }

    let placed = OrderRepository::new(state.pool())
        .place_order(
            user.map(|u| u.id),
            &request.shipping_address,
            request.payment_method,
            request.items,
            state.config().cod_delivery_fee,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PlaceOrderResponse {
            message: "Order created successfully",
            order: placed.order,
            items: placed.items,
            delivery_fee: placed.delivery_fee,
        }),
    ))
}

/// `GET /api/orders`
pub async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Value>> {
    let page = Page::new(
        query.page.unwrap_or(1),
        query.limit.unwrap_or(Page::DEFAULT_PER_PAGE),
    );

    let (orders, total) = OrderRepository::new(state.pool())
        .list_for_user(user.id, query.status, page)
        .await?;

    Ok(Json(json!({
        "orders": orders,
        "pagination": Pagination::new(page, total),
    })))
}

/// `GET /api/orders/{id}`
pub async fn get_one(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Value>> {
    let (order, items) = OrderRepository::new(state.pool())
        .get_for_user(id, user.id)
        .await?;

    Ok(Json(json!({ "order": order, "items": items })))
}

/// `PUT /api/orders/{id}/cancel`
pub async fn cancel(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Value>> {
    let order = OrderRepository::new(state.pool()).cancel(id, user.id).await?;

    Ok(Json(json!({
        "message": "Order cancelled successfully",
        "order": order,
    })))
}

/// `PUT /api/orders/{id}/status` (admin)
pub async fn update_status(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>> {
    let order = OrderRepository::new(state.pool())
        .update_status(id, request.status)
        .await?;

    Ok(Json(json!({
        "message": "Order status updated successfully",
        "order": order,
    })))
}
