//! Admin user-management route handlers.

use atelier_core::{Role, UserId};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::db::Page;
use crate::db::users::{UserPatch, UserRepository};
use crate::error::{ApiError, Result};
use crate::middleware::AdminUser;
use crate::routes::Pagination;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    pub role: Option<Role>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

/// `GET /api/users`
pub async fn list(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Value>> {
    let page = Page::new(
        query.page.unwrap_or(1),
        query.limit.unwrap_or(Page::DEFAULT_PER_PAGE),
    );

    let (users, total) = UserRepository::new(state.pool())
        .list(query.role, query.search.as_deref(), page)
        .await?;

    Ok(Json(json!({
        "users": users,
        "pagination": Pagination::new(page, total),
    })))
}

/// `PUT /api/users/{id}`
pub async fn update(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<Value>> {
    let patch = UserPatch {
        first_name: request.first_name,
        last_name: request.last_name,
        phone: request.phone,
        role: request.role,
        is_active: request.is_active,
    };
    if patch.is_empty() {
        return Err(ApiError::Validation("no fields to update".to_owned()));
    }

    let user = UserRepository::new(state.pool()).update(id, patch).await?;
    Ok(Json(json!({ "user": user })))
}

/// `DELETE /api/users/{id}` (soft delete)
pub async fn deactivate(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<Value>> {
    if admin.id == id {
        return Err(ApiError::Validation(
            "cannot deactivate your own account".to_owned(),
        ));
    }

    UserRepository::new(state.pool()).deactivate(id).await?;
    Ok(Json(json!({ "message": "User deactivated" })))
}
