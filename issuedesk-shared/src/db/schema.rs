/// Schema bootstrap
///
/// The application owns four tables and creates them itself on startup with
/// `CREATE TABLE IF NOT EXISTS`. There are no migrations: running the
/// bootstrap against an existing database is a no-op, and column changes to
/// existing tables must be applied by an operator.
///
/// # Schema
///
/// ```sql
/// users              (id, name, username UNIQUE, password_hash)
/// issues             (id, user_id -> users.id, module, description,
///                     status DEFAULT 'open', created_at, closed_at)
/// logins             (id, username, status, timestamp)
/// knowledge_articles (id, issue_id -> issues.id, author, title, content,
///                     created_at)
/// ```
///
/// # Example
///
/// ```no_run
/// use issuedesk_shared::db::pool::{create_pool, DatabaseConfig};
/// use issuedesk_shared::db::schema::{bootstrap_schema, missing_tables};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(&DatabaseConfig::default()).await?;
/// bootstrap_schema(&pool).await?;
/// assert!(missing_tables(&pool).await?.is_empty());
/// # Ok(())
/// # }
/// ```

use sqlx::mysql::MySqlPool;
use tracing::{debug, info};

/// Table definitions in creation order (referenced tables first)
const TABLES: [(&str, &str); 4] = [
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INT AUTO_INCREMENT PRIMARY KEY,
            name VARCHAR(100) NULL,
            username VARCHAR(100) NOT NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL
        )
        "#,
    ),
    (
        "issues",
        r#"
        CREATE TABLE IF NOT EXISTS issues (
            id INT AUTO_INCREMENT PRIMARY KEY,
            user_id INT NULL,
            module VARCHAR(100) NOT NULL,
            description TEXT NOT NULL,
            status VARCHAR(20) NOT NULL DEFAULT 'open',
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            closed_at TIMESTAMP NULL DEFAULT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id)
        )
        "#,
    ),
    (
        "logins",
        r#"
        CREATE TABLE IF NOT EXISTS logins (
            id INT AUTO_INCREMENT PRIMARY KEY,
            username VARCHAR(100) NOT NULL,
            status VARCHAR(20) NOT NULL,
            timestamp TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    ),
    (
        "knowledge_articles",
        r#"
        CREATE TABLE IF NOT EXISTS knowledge_articles (
            id INT AUTO_INCREMENT PRIMARY KEY,
            issue_id INT NOT NULL,
            author VARCHAR(100) NOT NULL,
            title VARCHAR(255) NOT NULL,
            content TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (issue_id) REFERENCES issues(id)
        )
        "#,
    ),
];

/// Names of every table the application owns, in creation order
pub fn table_names() -> impl Iterator<Item = &'static str> {
    TABLES.iter().map(|(name, _)| *name)
}

/// Creates any missing tables
///
/// Safe to run against a populated database and safe to run concurrently
/// from several processes; existing tables are left untouched.
///
/// # Errors
///
/// Returns an error if a statement fails, e.g. the user lacks `CREATE`
/// privilege or an existing table has an incompatible definition that a
/// foreign key cannot reference.
pub async fn bootstrap_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    info!("Bootstrapping database schema");

    for (name, ddl) in TABLES {
        debug!(table = name, "Ensuring table exists");
        sqlx::query(ddl).execute(pool).await?;
    }

    info!("Database schema ready");
    Ok(())
}

/// Returns the owned tables that do not exist in the current database
///
/// # Errors
///
/// Returns an error if `information_schema` cannot be queried
pub async fn missing_tables(pool: &MySqlPool) -> Result<Vec<&'static str>, sqlx::Error> {
    let present: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT CAST(table_name AS CHAR)
        FROM information_schema.tables
        WHERE table_schema = DATABASE()
        "#,
    )
    .fetch_all(pool)
    .await?;

    let missing: Vec<&'static str> = table_names()
        .filter(|name| !present.iter().any(|p| p.eq_ignore_ascii_case(name)))
        .collect();

    debug!(missing = ?missing, "Schema status retrieved");
    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_in_dependency_order() {
        let names: Vec<&str> = table_names().collect();
        assert_eq!(names, ["users", "issues", "logins", "knowledge_articles"]);

        // A table may only reference tables created before it
        for (i, (_, ddl)) in TABLES.iter().enumerate() {
            for (later, _) in &TABLES[i + 1..] {
                assert!(
                    !ddl.contains(&format!("REFERENCES {}(", later)),
                    "{} is referenced before it is created",
                    later
                );
            }
        }
    }

    #[test]
    fn test_every_statement_is_idempotent() {
        for (name, ddl) in TABLES {
            assert!(
                ddl.contains(&format!("CREATE TABLE IF NOT EXISTS {} (", name)),
                "{} must use CREATE TABLE IF NOT EXISTS",
                name
            );
        }
    }

    #[test]
    fn test_login_log_username_width() {
        use crate::models::login_attempt::MAX_LOGGED_USERNAME_CHARS;

        let (_, logins) = TABLES[2];
        assert!(logins.contains(&format!(
            "username VARCHAR({}) NOT NULL",
            MAX_LOGGED_USERNAME_CHARS
        )));
    }

    #[test]
    fn test_issue_status_defaults_to_open() {
        let (_, issues) = TABLES[1];
        assert!(issues.contains("status VARCHAR(20) NOT NULL DEFAULT 'open'"));
        assert!(issues.contains("closed_at TIMESTAMP NULL"));
    }
}
