//! Custom-art commission route handlers.

use atelier_core::{Email, SketchSize, sketch_quote};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::db::custom_art::{CustomArtRepository, NewPaintingRequest, NewSketchRequest};
use crate::error::{ApiError, Result};
use crate::middleware::AuthUser;
use crate::routes::{PageQuery, Pagination};
use crate::state::AppState;

/// Largest group size accepted for a sketch commission.
const MAX_PERSON_COUNT: i32 = 20;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SketchRequestBody {
    pub name: String,
    pub email: String,
    pub size: SketchSize,
    pub person_count: i32,
    pub photo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintingRequestBody {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub description: String,
}

/// `POST /api/custom-art/sketch`
///
/// The quote is computed from the pricing table at intake and stored with
/// the request.
pub async fn create_sketch(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(body): Json<SketchRequestBody>,
) -> Result<(StatusCode, Json<Value>)> {
    if body.name.trim().is_empty() {
        return Err(ApiError::Validation("name is required".to_owned()));
    }
    if body.person_count < 1 || body.person_count > MAX_PERSON_COUNT {
        return Err(ApiError::Validation(format!(
            "personCount must be between 1 and {MAX_PERSON_COUNT}"
        )));
    }
    let email = parse_email(&body.email)?;

    #[allow(clippy::cast_sign_loss)]
    let price = sketch_quote(body.person_count as u32, body.size);

    let request = CustomArtRepository::new(state.pool())
        .create_sketch_request(
            user.id,
            NewSketchRequest {
                name: body.name.trim(),
                email: &email,
                size: body.size,
                person_count: body.person_count,
                photo_url: body.photo_url.as_deref(),
            },
            price,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "request": request }))))
}

/// `POST /api/custom-art/painting`
pub async fn create_painting(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(body): Json<PaintingRequestBody>,
) -> Result<(StatusCode, Json<Value>)> {
    if body.name.trim().is_empty() {
        return Err(ApiError::Validation("name is required".to_owned()));
    }
    if body.description.trim().is_empty() {
        return Err(ApiError::Validation("description is required".to_owned()));
    }
    let email = parse_email(&body.email)?;

    let request = CustomArtRepository::new(state.pool())
        .create_painting_request(
            user.id,
            NewPaintingRequest {
                name: body.name.trim(),
                email: &email,
                phone: body.phone.as_deref(),
                description: body.description.trim(),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "request": request }))))
}

/// `GET /api/custom-art/sketches`
pub async fn list_sketches(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>> {
    let page = query.to_page();
    let (requests, total) = CustomArtRepository::new(state.pool())
        .list_sketch_requests_for_user(user.id, page)
        .await?;

    Ok(Json(json!({
        "requests": requests,
        "pagination": Pagination::new(page, total),
    })))
}

/// `GET /api/custom-art/paintings`
pub async fn list_paintings(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>> {
    let page = query.to_page();
    let (requests, total) = CustomArtRepository::new(state.pool())
        .list_painting_requests_for_user(user.id, page)
        .await?;

    Ok(Json(json!({
        "requests": requests,
        "pagination": Pagination::new(page, total),
    })))
}

fn parse_email(raw: &str) -> Result<Email> {
    Email::parse(raw.trim()).map_err(|e| ApiError::Validation(format!("invalid email: {e}")))
}
