//! Unified error handling with Sentry integration.
//!
//! Every route handler returns `Result<T, ApiError>`. Responses carry a
//! stable machine-readable `error` kind plus a human `message`; some kinds
//! attach extra fields (`available`, `currentStatus`). Server faults are
//! captured to Sentry before the response is built and never leak details to
//! the client.

use atelier_core::OrderStatus;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request failed validation before touching storage.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Resource absent, inactive, or not visible to the requester.
    #[error("not found")]
    NotFound,

    /// A requested quantity exceeds available stock.
    #[error("{message}")]
    InsufficientStock { available: i32, message: String },

    /// Order placement resolved zero items.
    #[error("no items to order")]
    EmptyOrder,

    /// Illegal order status change.
    #[error("invalid status transition from '{current}'")]
    InvalidTransition { current: OrderStatus },

    /// Missing or invalid bearer token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("forbidden")]
    Forbidden,

    /// Unique constraint conflict, e.g. duplicate email.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Authentication operation failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::Conflict(what) => Self::Conflict(what),
            RepositoryError::InsufficientStock { available, message } => {
                Self::InsufficientStock { available, message }
            }
            RepositoryError::EmptyOrder => Self::EmptyOrder,
            RepositoryError::InvalidTransition { current } => Self::InvalidTransition { current },
            RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl ApiError {
    /// Stable machine-readable kind for the response body.
    fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound => "not_found",
            Self::InsufficientStock { .. } => "insufficient_stock",
            Self::EmptyOrder => "empty_order",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::Conflict(_) => "conflict",
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_) | AuthError::WeakPassword(_) => "validation",
                AuthError::UserAlreadyExists => "conflict",
                AuthError::Repository(_) | AuthError::PasswordHash => "internal",
                _ => "unauthorized",
            },
            Self::Internal(_) => "internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::InsufficientStock { .. }
            | Self::EmptyOrder
            | Self::InvalidTransition { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_) | AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                _ => StatusCode::UNAUTHORIZED,
            },
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Human text for the response body. Internal details stay server-side.
    fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => "Internal server error".to_owned(),
            Self::NotFound => "Resource not found".to_owned(),
            Self::Forbidden => "Admin access required".to_owned(),
            Self::Conflict(what) => format!("{what} already exists"),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_owned(),
                AuthError::AccountDeactivated => "Account is deactivated".to_owned(),
                AuthError::UserAlreadyExists => {
                    "An account with this email already exists".to_owned()
                }
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidEmail(_) => "Invalid email address".to_owned(),
                AuthError::TokenExpired => "Token expired".to_owned(),
                AuthError::TokenInvalid => "Invalid token".to_owned(),
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    "Internal server error".to_owned()
                }
            },
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status() == StatusCode::INTERNAL_SERVER_ERROR {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let mut body = json!({
            "error": self.kind(),
            "message": self.public_message(),
        });
        match &self {
            Self::InsufficientStock { available, .. } => {
                body["available"] = json!(available);
            }
            Self::InvalidTransition { current } => {
                body["currentStatus"] = json!(current);
            }
            _ => {}
        }

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(ToOwned::to_owned),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_mapping() {
        assert!(matches!(
            ApiError::from(RepositoryError::NotFound),
            ApiError::NotFound
        ));
        assert!(matches!(
            ApiError::from(RepositoryError::EmptyOrder),
            ApiError::EmptyOrder
        ));
        let err = ApiError::from(RepositoryError::InsufficientStock {
            available: 2,
            message: "Only 2 items available".to_owned(),
        });
        assert!(matches!(err, ApiError::InsufficientStock { available: 2, .. }));
    }

    #[test]
    fn test_kinds_are_stable() {
        assert_eq!(ApiError::NotFound.kind(), "not_found");
        assert_eq!(ApiError::EmptyOrder.kind(), "empty_order");
        assert_eq!(
            ApiError::InvalidTransition {
                current: OrderStatus::Shipped
            }
            .kind(),
            "invalid_transition"
        );
        assert_eq!(ApiError::Auth(AuthError::TokenExpired).kind(), "unauthorized");
        assert_eq!(
            ApiError::Auth(AuthError::UserAlreadyExists).kind(),
            "conflict"
        );
    }

    #[test]
    fn test_internal_details_not_exposed() {
        let err = ApiError::Internal("connection refused to 10.0.0.3".to_owned());
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::Conflict("email".to_owned()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Auth(AuthError::InvalidCredentials).status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
