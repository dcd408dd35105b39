//! Authentication extractors.
//!
//! Tokens are stateless; the extractor re-fetches the user on every request
//! so deactivation takes effect immediately rather than at token expiry.
//!
//! # Example
//!
//! ```rust,ignore
//! async fn protected_handler(AuthUser(user): AuthUser) -> impl IntoResponse {
//!     format!("Hello, {}!", user.first_name)
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::db::users::UserRepository;
use crate::error::ApiError;
use crate::models::User;
use crate::services::auth;
use crate::state::AppState;

/// Extractor that requires a valid bearer token for an active account.
pub struct AuthUser(pub User);

/// Extractor that accepts requests with or without a bearer token.
///
/// A missing, malformed, or invalid token yields `None` instead of a
/// rejection; guest checkout depends on this.
pub struct OptionalAuthUser(pub Option<User>);

/// Extractor that requires a valid bearer token for an active admin account.
pub struct AdminUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_owned()))?;

        let user_id = auth::verify_token(token, &state.config().jwt_secret)?;

        let user = UserRepository::new(state.pool())
            .get_by_id(user_id)
            .await
            .map_err(|_| ApiError::Unauthorized("unknown user".to_owned()))?;

        if !user.is_active {
            return Err(ApiError::Unauthorized("account is deactivated".to_owned()));
        }

        crate::error::set_sentry_user(&user.id, Some(user.email.as_str()));

        Ok(Self(user))
    }
}

impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state)
            .await
            .map(|AuthUser(user)| user)
            .ok();
        Ok(Self(user))
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;

        if !user.role.is_admin() {
            return Err(ApiError::Forbidden);
        }

        Ok(Self(user))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderValue, Request};

    use super::*;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/orders");
        if let Some(value) = value {
            builder = builder.header(
                header::AUTHORIZATION,
                HeaderValue::from_str(value).unwrap(),
            );
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_extraction() {
        let parts = parts_with_auth(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts), Some("abc.def.ghi"));
    }

    #[test]
    fn test_missing_and_malformed_headers() {
        assert_eq!(bearer_token(&parts_with_auth(None)), None);
        assert_eq!(bearer_token(&parts_with_auth(Some("Basic dXNlcg=="))), None);
        assert_eq!(bearer_token(&parts_with_auth(Some("bearer abc"))), None);
    }
}
