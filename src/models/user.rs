use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteExecutor};
use validator::Validate;

/// A registered account as stored in the `users` table.
///
/// Serializing a `User` yields its public representation; the password hash
/// never leaves the server.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Payload of `POST /api/register`.
///
/// Fields are optional at the serde level so that absent and empty values are
/// both reported as validation failures instead of deserialization errors.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(required, length(min = 1, max = 80))]
    pub username: Option<String>,
    #[validate(required, length(min = 1, max = 120))]
    pub email: Option<String>,
    #[validate(required, length(min = 1))]
    pub password: Option<String>,
}

/// Payload of `POST /api/login`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(required, length(min = 1))]
    pub username: Option<String>,
    #[validate(required, length(min = 1))]
    pub password: Option<String>,
}

// Credential store. Queries take any SQLite executor: the pool, a connection
// or a transaction.
impl User {
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<User>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    pub async fn find_by_username<'e, E>(
        executor: E,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(executor)
        .await
    }

    pub async fn username_exists<'e, E>(executor: E, username: &str) -> Result<bool, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(executor)
            .await?;
        Ok(row.is_some())
    }

    pub async fn email_exists<'e, E>(executor: E, email: &str) -> Result<bool, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(executor)
            .await?;
        Ok(row.is_some())
    }

    /// Inserts a new account. A duplicate username or email fails with a
    /// unique-constraint violation.
    pub async fn insert<'e, E>(
        executor: E,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, password_hash, created_at)
             VALUES (?, ?, ?, ?)
             RETURNING id, username, email, password_hash, created_at",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(executor)
        .await
    }

    /// Removes the account. Owned tasks go with it through `ON DELETE CASCADE`.
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
