//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! atelier-cli admin create -e admin@example.com -p <password> -f Ada -l Lovelace
//! ```
//!
//! # Environment Variables
//!
//! - `ATELIER_DATABASE_URL` - `PostgreSQL` connection string

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use atelier_core::{Email, Role};
use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] atelier_core::EmailError),

    /// Password too short.
    #[error("Password must be at least 8 characters")]
    WeakPassword,

    /// User already exists.
    #[error("User already exists with email: {0}")]
    UserExists(String),

    /// Password hashing failed.
    #[error("Password hashing failed")]
    PasswordHash,
}

/// Create a new admin account.
///
/// # Errors
///
/// Returns `AdminError` if the email is invalid, the password is too short,
/// the account already exists, or the database is unreachable.
pub async fn create_user(
    email: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
) -> Result<i32, AdminError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email)?;
    if password.len() < 8 {
        return Err(AdminError::WeakPassword);
    }

    let database_url = std::env::var("ATELIER_DATABASE_URL")
        .map_err(|_| AdminError::MissingEnvVar("ATELIER_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    let existing: Option<i32> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&pool)
        .await?;

    if existing.is_some() {
        return Err(AdminError::UserExists(email.to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AdminError::PasswordHash)?
        .to_string();

    let user_id: i32 = sqlx::query_scalar(
        r"
        INSERT INTO users (first_name, last_name, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        ",
    )
    .bind(first_name)
    .bind(last_name)
    .bind(&email)
    .bind(&password_hash)
    .bind(Role::Admin)
    .fetch_one(&pool)
    .await?;

    tracing::info!("Admin user created: {} ({})", email, user_id);

    Ok(user_id)
}
