/// Knowledge article model and database operations
///
/// A knowledge article documents how an issue was resolved. It is usually
/// written right after closing the issue, but nothing requires the issue to
/// be closed.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE knowledge_articles (
///     id INT AUTO_INCREMENT PRIMARY KEY,
///     issue_id INT NOT NULL REFERENCES issues(id),
///     author VARCHAR(100) NOT NULL,
///     title VARCHAR(255) NOT NULL,
///     content TEXT NOT NULL,
///     created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlPool;

use super::inserted_id;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct KnowledgeArticle {
    pub id: i32,

    /// Issue the article is attached to
    pub issue_id: i32,

    /// Username of the session that wrote the article
    pub author: String,

    pub title: String,

    pub content: String,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a knowledge article
#[derive(Debug, Clone)]
pub struct CreateKnowledgeArticle {
    pub issue_id: i32,
    pub author: String,
    pub title: String,
    pub content: String,
}

impl KnowledgeArticle {
    /// Inserts an article and returns its ID
    ///
    /// # Errors
    ///
    /// Returns a foreign key violation if `issue_id` references no issue
    pub async fn create(pool: &MySqlPool, data: CreateKnowledgeArticle) -> Result<i32, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO knowledge_articles (issue_id, author, title, content)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(data.issue_id)
        .bind(&data.author)
        .bind(&data.title)
        .bind(&data.content)
        .execute(pool)
        .await?;

        inserted_id(result.last_insert_id())
    }

    /// Lists the articles attached to an issue, oldest first
    pub async fn list_by_issue(pool: &MySqlPool, issue_id: i32) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, KnowledgeArticle>(
            r#"
            SELECT id, issue_id, author, title, content, created_at
            FROM knowledge_articles
            WHERE issue_id = ?
            ORDER BY created_at, id
            "#,
        )
        .bind(issue_id)
        .fetch_all(pool)
        .await
    }
}
