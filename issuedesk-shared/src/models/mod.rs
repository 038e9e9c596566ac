/// Database models for IssueDesk
///
/// Each model owns the parameterized SQL for its table.
///
/// # Models
///
/// - `user`: Accounts created by signup
/// - `issue`: Reported problems with an open -> closed lifecycle
/// - `login_attempt`: Append-only audit log of login attempts
/// - `knowledge_article`: Resolution write-ups attached to issues
///
/// # Example
///
/// ```no_run
/// use issuedesk_shared::models::issue::{CreateIssue, Issue};
/// use issuedesk_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(&DatabaseConfig::default()).await?;
///
/// let issue = Issue::create(&pool, CreateIssue {
///     user_id: None,
///     module: "Billing".to_string(),
///     description: "Invoice totals are off by one cent".to_string(),
/// }).await?;
///
/// Issue::close(&pool, issue.id).await?;
/// # Ok(())
/// # }
/// ```

pub mod issue;
pub mod knowledge_article;
pub mod login_attempt;
pub mod user;

/// Converts a MySQL `LAST_INSERT_ID()` into the `INT` key type used by every table
pub(crate) fn inserted_id(last_insert_id: u64) -> Result<i32, sqlx::Error> {
    i32::try_from(last_insert_id).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inserted_id_in_range() {
        assert_eq!(inserted_id(42).unwrap(), 42);
        assert_eq!(inserted_id(i32::MAX as u64).unwrap(), i32::MAX);
    }

    #[test]
    fn test_inserted_id_overflow() {
        assert!(inserted_id(i32::MAX as u64 + 1).is_err());
    }
}
