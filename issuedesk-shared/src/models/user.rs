/// User model and database operations
///
/// Users are created by signup and never updated or deleted.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id INT AUTO_INCREMENT PRIMARY KEY,
///     name VARCHAR(100) NULL,
///     username VARCHAR(100) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use issuedesk_shared::auth::password::hash_password;
/// use issuedesk_shared::models::user::{CreateUser, User};
/// use issuedesk_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(&DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     name: Some("Abhi".to_string()),
///     username: "abhi".to_string(),
///     password_hash: hash_password("pw")?,
/// }).await?;
///
/// let found = User::find_by_username(&pool, "abhi").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlPool;

use super::inserted_id;

/// A user account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Surrogate key
    pub id: i32,

    /// Optional display name
    pub name: Option<String>,

    /// Login name, unique across all users
    pub username: String,

    /// Argon2id PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Optional display name
    pub name: Option<String>,

    /// Login name
    pub username: String,

    /// Argon2id hash (NOT the plaintext password)
    pub password_hash: String,
}

impl User {
    /// Inserts a new user and returns the stored row
    ///
    /// # Errors
    ///
    /// Returns a database error if the username is already taken (unique
    /// violation) or the connection fails.
    pub async fn create(pool: &MySqlPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (name, username, password_hash)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&data.name)
        .bind(&data.username)
        .bind(&data.password_hash)
        .execute(pool)
        .await?;

        Ok(User {
            id: inserted_id(result.last_insert_id())?,
            name: data.name,
            username: data.username,
            password_hash: data.password_hash,
        })
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &MySqlPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, username, password_hash
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Finds a user by username
    ///
    /// Matching follows the column collation, which is case-insensitive
    /// under MySQL's default collations.
    pub async fn find_by_username(
        pool: &MySqlPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, username, password_hash
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await
    }

    /// Resolves a username to its user ID
    ///
    /// Returns None if no such user exists, e.g. when a session outlives the row.
    pub async fn id_for_username(
        pool: &MySqlPool,
        username: &str,
    ) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Counts users with the given username (0 or 1)
    pub async fn count_by_username(pool: &MySqlPool, username: &str) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
