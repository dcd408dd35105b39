//! Auth route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{ApiError, Result};
use crate::middleware::AuthUser;
use crate::models::User;
use crate::services::auth::{AuthService, Registration};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    if request.first_name.trim().is_empty() {
        return Err(ApiError::Validation("firstName is required".to_owned()));
    }
    if request.last_name.trim().is_empty() {
        return Err(ApiError::Validation("lastName is required".to_owned()));
    }

    let config = state.config();
    let service = AuthService::new(state.pool(), &config.jwt_secret, config.token_ttl_hours);
    let (user, token) = service
        .register(Registration {
            first_name: request.first_name.trim(),
            last_name: request.last_name.trim(),
            email: request.email.trim(),
            password: &request.password,
            phone: request.phone.as_deref(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let config = state.config();
    let service = AuthService::new(state.pool(), &config.jwt_secret, config.token_ttl_hours);
    let (user, token) = service.login(request.email.trim(), &request.password).await?;

    Ok(Json(AuthResponse { token, user }))
}

/// `GET /api/auth/me`
pub async fn me(AuthUser(user): AuthUser) -> Json<Value> {
    Json(json!({ "user": user }))
}
