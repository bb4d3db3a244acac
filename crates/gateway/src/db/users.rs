//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use stylish_core::{Email, Provider, ProviderError, Role, RoleError, UserId, UserProfile};

use super::{RepositoryError, conflict_or_database};

const USER_COLUMNS: &str = "id, provider, role, name, email, password_hash, picture, created_at";

/// A stored account (domain type).
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: UserId,
    pub provider: Provider,
    pub role: Role,
    pub name: String,
    pub email: Email,
    /// Argon2 PHC string; `None` for accounts created through Facebook.
    pub password_hash: Option<String>,
    pub picture: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            provider: self.provider,
            name: self.name.clone(),
            email: self.email.to_string(),
            picture: self.picture.clone(),
        }
    }
}

/// Fields needed to insert an account.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub provider: Provider,
    pub role: Role,
    pub name: &'a str,
    pub email: &'a Email,
    pub password_hash: Option<&'a str>,
    pub picture: Option<&'a str>,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    provider: String,
    role: String,
    name: String,
    email: String,
    password_hash: Option<String>,
    picture: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = |e: String| RepositoryError::DataCorruption(format!("user {id}: {e}"));

        Ok(Self {
            id: UserId::new(id),
            provider: row.provider.parse().map_err(|e: ProviderError| corrupt(e.to_string()))?,
            role: row.role.parse().map_err(|e: RoleError| corrupt(e.to_string()))?,
            email: Email::parse(&row.email).map_err(|e| corrupt(e.to_string()))?,
            name: row.name,
            password_hash: row.password_hash,
            picture: row.picture,
            created_at: row.created_at,
        })
    }
}

/// Repository for account reads and writes.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<UserRecord>, RepositoryError> {
        let query = format!("SELECT {USER_COLUMNS} FROM app_user WHERE email = $1");
        let row: Option<UserRow> = sqlx::query_as(&query)
            .bind(email.as_str())
            .fetch_optional(self.pool)
            .await?;

        row.map(UserRecord::try_from).transpose()
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<UserRecord>, RepositoryError> {
        let query = format!("SELECT {USER_COLUMNS} FROM app_user WHERE id = $1");
        let row: Option<UserRow> = sqlx::query_as(&query)
            .bind(id.as_i64())
            .fetch_optional(self.pool)
            .await?;

        row.map(UserRecord::try_from).transpose()
    }

    /// Insert a new account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, user: &NewUser<'_>) -> Result<UserRecord, RepositoryError> {
        let query = format!(
            "INSERT INTO app_user (provider, role, name, email, password_hash, picture) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {USER_COLUMNS}"
        );
        let row: UserRow = sqlx::query_as(&query)
            .bind(user.provider.as_str())
            .bind(user.role.as_str())
            .bind(user.name)
            .bind(user.email.as_str())
            .bind(user.password_hash)
            .bind(user.picture)
            .fetch_one(self.pool)
            .await
            .map_err(|e| conflict_or_database(e, "email"))?;

        UserRecord::try_from(row)
    }

    /// Refresh the display name and picture of a Facebook account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update_social_profile(
        &self,
        id: UserId,
        name: &str,
        picture: Option<&str>,
    ) -> Result<UserRecord, RepositoryError> {
        let query = format!(
            "UPDATE app_user SET name = $2, picture = $3 WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let row: UserRow = sqlx::query_as(&query)
            .bind(id.as_i64())
            .bind(name)
            .bind(picture)
            .fetch_one(self.pool)
            .await?;

        UserRecord::try_from(row)
    }
}
