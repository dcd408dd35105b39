//! Authentication service.
//!
//! Password registration and login backed by Argon2id hashes, plus the
//! bearer tokens every authenticated route consumes.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use atelier_core::{Email, Role, UserId};

use crate::db::RepositoryError;
use crate::db::users::{NewUser, UserRepository};
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Fields accepted at registration.
#[derive(Debug)]
pub struct Registration<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub phone: Option<&'a str>,
}

/// Authentication service.
///
/// Handles user registration, login, and bearer token issuance.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    jwt_secret: &'a SecretString,
    token_ttl_hours: i64,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, jwt_secret: &'a SecretString, token_ttl_hours: i64) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt_secret,
            token_ttl_hours,
        }
    }

    /// Register a new customer account and issue a token for it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(&self, registration: Registration<'_>) -> Result<(User, String), AuthError> {
        let email = Email::parse(registration.email)?;
        validate_password(registration.password)?;
        let password_hash = hash_password(registration.password)?;

        let user = self
            .users
            .create(NewUser {
                first_name: registration.first_name,
                last_name: registration.last_name,
                email: &email,
                password_hash: &password_hash,
                phone: registration.phone,
                role: Role::Customer,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        let token = issue_token(user.id, self.jwt_secret, self.token_ttl_hours)?;
        Ok((user, token))
    }

    /// Login with email and password.
    ///
    /// An unknown email and a wrong password are indistinguishable in the
    /// result; a deactivated account is reported as such only after the
    /// credentials check out.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AuthError::AccountDeactivated` for a valid login on a
    /// deactivated account.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_by_email_with_password(&email)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::InvalidCredentials,
                other => AuthError::Repository(other),
            })?;

        verify_password(password, &password_hash)?;

        if !user.is_active {
            return Err(AuthError::AccountDeactivated);
        }

        let token = issue_token(user.id, self.jwt_secret, self.token_ttl_hours)?;
        Ok((user, token))
    }
}

/// Bearer token claims. `sub` is the user id.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: i32,
    iat: i64,
    exp: i64,
}

/// Sign a token for a user.
///
/// # Errors
///
/// Returns `AuthError::TokenInvalid` if signing fails.
pub fn issue_token(
    user_id: UserId,
    secret: &SecretString,
    ttl_hours: i64,
) -> Result<String, AuthError> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id.into(),
        iat: now.timestamp(),
        exp: (now + chrono::Duration::hours(ttl_hours)).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .map_err(|_| AuthError::TokenInvalid)
}

/// Validate a token's signature and expiry, returning the subject.
///
/// # Errors
///
/// Returns `AuthError::TokenExpired` for an expired token and
/// `AuthError::TokenInvalid` for anything else that fails validation.
pub fn verify_token(token: &str, secret: &SecretString) -> Result<UserId, AuthError> {
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::TokenInvalid,
    })?;

    Ok(UserId::from(data.claims.sub))
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret() -> SecretString {
        SecretString::from("test-secret-used-only-in-unit-tests!")
    }

    #[test]
    fn test_password_length_floor() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long enough password").is_ok());
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password!", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_token_roundtrip() {
        let token = issue_token(UserId::from(42), &secret(), 1).unwrap();
        let user_id = verify_token(&token, &secret()).unwrap();
        assert_eq!(user_id, UserId::from(42));
    }

    #[test]
    fn test_token_wrong_secret_rejected() {
        let token = issue_token(UserId::from(42), &secret(), 1).unwrap();
        let other = SecretString::from("a-completely-different-secret-value");
        assert!(matches!(
            verify_token(&token, &other),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = issue_token(UserId::from(42), &secret(), -1).unwrap();
        assert!(matches!(
            verify_token(&token, &secret()),
            Err(AuthError::TokenExpired)
        ));
    }
}
