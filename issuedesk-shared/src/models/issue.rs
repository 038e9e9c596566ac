/// Issue model and database operations
///
/// # Lifecycle
///
/// ```text
/// open → closed
/// ```
///
/// Closing is idempotent: closing an already closed issue changes nothing,
/// and `closed_at` keeps the time of the first close.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE issues (
///     id INT AUTO_INCREMENT PRIMARY KEY,
///     user_id INT NULL REFERENCES users(id),
///     module VARCHAR(100) NOT NULL,
///     description TEXT NOT NULL,
///     status VARCHAR(20) NOT NULL DEFAULT 'open',
///     created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
///     closed_at TIMESTAMP NULL DEFAULT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlPool;
use std::fmt;
use std::str::FromStr;

use super::inserted_id;

/// Issue status as stored in `issues.status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    /// Reported and not yet resolved
    Open,

    /// Resolved
    Closed,
}

/// A status column held a value other than `open`/`closed`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown status: {0:?}")]
pub struct UnknownStatus(pub String);

impl IssueStatus {
    /// Converts status to its stored string
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Open => "open",
            IssueStatus::Closed => "closed",
        }
    }

    /// Checks if the issue still needs attention
    pub fn is_open(&self) -> bool {
        matches!(self, IssueStatus::Open)
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(IssueStatus::Open),
            "closed" => Ok(IssueStatus::Closed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for IssueStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A reported issue
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Issue {
    /// Surrogate key
    pub id: i32,

    /// Reporter, None if the reporting user no longer resolved at report time
    pub user_id: Option<i32>,

    /// Free-text module name, e.g. "Billing"
    pub module: String,

    /// Free-text description
    pub description: String,

    /// Current status
    #[sqlx(try_from = "String")]
    pub status: IssueStatus,

    /// When the issue was reported
    pub created_at: DateTime<Utc>,

    /// When the issue was first closed
    pub closed_at: Option<DateTime<Utc>>,
}

/// Input for reporting a new issue
#[derive(Debug, Clone)]
pub struct CreateIssue {
    /// Reporter
    pub user_id: Option<i32>,

    /// Module name
    pub module: String,

    /// Description
    pub description: String,
}

const SELECT_COLUMNS: &str = "SELECT id, user_id, module, description, status, created_at, closed_at FROM issues";

impl Issue {
    /// Inserts a new open issue and returns the stored row
    ///
    /// # Errors
    ///
    /// Returns a database error if `user_id` references no user or the
    /// connection fails
    pub async fn create(pool: &MySqlPool, data: CreateIssue) -> Result<Self, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO issues (user_id, module, description, status)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(data.user_id)
        .bind(&data.module)
        .bind(&data.description)
        .bind(IssueStatus::Open.as_str())
        .execute(pool)
        .await?;

        let id = inserted_id(result.last_insert_id())?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Finds an issue by ID
    pub async fn find_by_id(pool: &MySqlPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Issue>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists every issue, most recently reported first
    ///
    /// Ties on `created_at` (second resolution) are broken by ID so the
    /// newest insert always comes first.
    pub async fn list_recent_first(pool: &MySqlPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Issue>(&format!(
            "{} ORDER BY created_at DESC, id DESC",
            SELECT_COLUMNS
        ))
        .fetch_all(pool)
        .await
    }

    /// Marks an issue closed
    ///
    /// No existence or status check is made: an unknown ID updates nothing
    /// and an already closed issue keeps its original `closed_at`.
    pub async fn close(pool: &MySqlPool, id: i32) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE issues
            SET status = ?, closed_at = COALESCE(closed_at, CURRENT_TIMESTAMP)
            WHERE id = ?
            "#,
        )
        .bind(IssueStatus::Closed.as_str())
        .bind(id)
        .execute(pool)
        .await?;

        Ok(())
    }
}
