//! User repository.
//!
//! Password hashes never leave this module except through
//! [`UserRepository::get_by_email_with_password`], which the login flow
//! consumes directly.

use atelier_core::{Email, Role, UserId};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{Page, RepositoryError};
use crate::models::User;

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, phone, role, is_active, created_at, updated_at";

/// Fields for a new account. The hash is produced by the auth service.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a Email,
    pub password_hash: &'a str,
    pub phone: Option<&'a str>,
    pub role: Role,
}

/// Partial update for the admin surface. `None` leaves a column untouched.
#[derive(Debug, Default)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

impl UserPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.role.is_none()
            && self.is_active.is_none()
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when the email is already taken.
    pub async fn create(&self, new_user: NewUser<'_>) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(&format!(
            r"
            INSERT INTO users (first_name, last_name, email, password_hash, phone, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(new_user.first_name)
        .bind(new_user.last_name)
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .bind(new_user.phone)
        .bind(new_user.role)
        .fetch_one(self.pool)
        .await
        .map_err(|err| RepositoryError::conflict_on_unique(err, "email"))
    }

    /// Fetch a user together with their password hash for credential checks.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when no account matches.
    pub async fn get_by_email_with_password(
        &self,
        email: &Email,
    ) -> Result<(User, String), RepositoryError> {
        let row = sqlx::query_as::<_, UserWithPassword>(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok((row.user, row.password_hash))
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when no account matches.
    pub async fn get_by_id(&self, id: UserId) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Admin listing with optional role filter and name/email search.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        role: Option<Role>,
        search: Option<&str>,
        page: Page,
    ) -> Result<(Vec<User>, i64), RepositoryError> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {USER_COLUMNS} FROM users WHERE TRUE"));
        push_user_filters(&mut qb, role, search);
        qb.push(" ORDER BY created_at DESC LIMIT ");
        qb.push_bind(page.limit());
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());

        let users = qb.build_query_as::<User>().fetch_all(self.pool).await?;

        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users WHERE TRUE");
        push_user_filters(&mut count_qb, role, search);
        let total: i64 = count_qb.build_query_scalar().fetch_one(self.pool).await?;

        Ok((users, total))
    }

    /// Apply a partial update and return the fresh row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when no account matches.
    pub async fn update(&self, id: UserId, patch: UserPatch) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(&format!(
            r"
            UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                phone = COALESCE($4, phone),
                role = COALESCE($5, role),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(patch.first_name)
        .bind(patch.last_name)
        .bind(patch.phone)
        .bind(patch.role)
        .bind(patch.is_active)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Soft-delete: the row stays, logins and auth guards reject it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when no account matches.
    pub async fn deactivate(&self, id: UserId) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE users SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

fn push_user_filters(qb: &mut QueryBuilder<'_, Postgres>, role: Option<Role>, search: Option<&str>) {
    if let Some(role) = role {
        qb.push(" AND role = ");
        qb.push_bind(role);
    }
    if let Some(search) = search
        && !search.trim().is_empty()
    {
        let pattern = format!("%{}%", search.trim());
        qb.push(" AND (first_name ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR last_name ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR email ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
}

#[derive(sqlx::FromRow)]
struct UserWithPassword {
    #[sqlx(flatten)]
    user: User,
    password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_emptiness() {
        assert!(UserPatch::default().is_empty());
        let patch = UserPatch {
            is_active: Some(false),
            ..UserPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
