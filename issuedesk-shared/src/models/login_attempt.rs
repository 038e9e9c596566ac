/// Login attempt audit log
///
/// Every POST to the login form appends one row, whether or not the
/// username belongs to an account. Rows are never updated or deleted.
///
/// Usernames longer than the column are cut to [`MAX_LOGGED_USERNAME_CHARS`]
/// characters so that an oversized form value is still logged instead of
/// failing the insert.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE logins (
///     id INT AUTO_INCREMENT PRIMARY KEY,
///     username VARCHAR(100) NOT NULL,
///     status VARCHAR(20) NOT NULL,
///     timestamp TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlPool;
use std::str::FromStr;

use super::inserted_id;
use super::issue::UnknownStatus;

/// Width of `logins.username`, in characters
pub const MAX_LOGGED_USERNAME_CHARS: usize = 100;

/// The form of `username` that fits in `logins.username`
pub fn logged_username(username: &str) -> &str {
    match username.char_indices().nth(MAX_LOGGED_USERNAME_CHARS) {
        Some((cut, _)) => &username[..cut],
        None => username,
    }
}

/// Outcome of a login attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginStatus {
    /// Credentials matched and a session was issued
    Success,

    /// Unknown username or wrong password
    Failed,
}

impl LoginStatus {
    /// Converts status to its stored string
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginStatus::Success => "success",
            LoginStatus::Failed => "failed",
        }
    }
}

impl FromStr for LoginStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(LoginStatus::Success),
            "failed" => Ok(LoginStatus::Failed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for LoginStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One recorded login attempt
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LoginAttempt {
    pub id: i32,

    /// Username as typed; not required to exist in `users`
    pub username: String,

    #[sqlx(try_from = "String")]
    pub status: LoginStatus,

    pub timestamp: DateTime<Utc>,
}

impl LoginAttempt {
    /// Appends an attempt to the log and returns its ID
    pub async fn record(
        pool: &MySqlPool,
        username: &str,
        status: LoginStatus,
    ) -> Result<i32, sqlx::Error> {
        let stored = logged_username(username);
        if stored.len() < username.len() {
            tracing::debug!(
                chars = username.chars().count(),
                "Truncating oversized username in login log"
            );
        }

        let result = sqlx::query("INSERT INTO logins (username, status) VALUES (?, ?)")
            .bind(stored)
            .bind(status.as_str())
            .execute(pool)
            .await?;

        inserted_id(result.last_insert_id())
    }

    /// Lists attempts for a username, oldest first
    ///
    /// `username` is truncated the same way [`LoginAttempt::record`] does.
    pub async fn list_by_username(
        pool: &MySqlPool,
        username: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, LoginAttempt>(
            r#"
            SELECT id, username, status, timestamp
            FROM logins
            WHERE username = ?
            ORDER BY id
            "#,
        )
        .bind(logged_username(username))
        .fetch_all(pool)
        .await
    }
}
